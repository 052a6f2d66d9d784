use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use catalog::{Movie, index_by_key};
use oracle::{OracleRequest, OracleSource};
use recommender::{Mode, Recommendation};
use server::{RecommendationOrchestrator, SessionState};
use taste::build_profiles;

/// taste-recs - Taste-profiled movie recommendations
#[derive(Parser)]
#[command(name = "taste-recs")]
#[command(about = "Movie recommendations from a watch-history taste profile", long_about = None)]
struct Cli {
    /// Path to the catalog JSON file
    #[arg(short, long, default_value = "data/catalog.json")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a recommendation batch for a watch history
    Recommend {
        /// Path to the watch-history CSV export
        #[arg(long)]
        history: PathBuf,

        /// Recommendation mode: "regular" or "super"
        #[arg(long, default_value = "regular")]
        mode: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        batch_size: usize,

        /// Movie liked this session, as "Title (Year)" (repeatable)
        #[arg(long = "like")]
        liked: Vec<String>,

        /// Movie to exclude, as "Title (Year)" (repeatable)
        #[arg(long = "exclude")]
        excluded: Vec<String>,

        /// Actor to pin to maximum profile weight (repeatable)
        #[arg(long = "actor")]
        preferred_actors: Vec<String>,

        /// Director to pin to maximum profile weight (repeatable)
        #[arg(long = "director")]
        preferred_directors: Vec<String>,
    },

    /// Show the taste profile built from a watch history
    Profile {
        /// Path to the watch-history CSV export
        #[arg(long)]
        history: PathBuf,

        /// How many entries to show per profile
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// List the catalog, highest-rated first
    Catalog {
        /// Number of movies to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

/// Stand-in oracle for offline runs: replies with nothing, so
/// under-filled Super batches simply stay short.
struct OfflineOracle;

impl OracleSource for OfflineOracle {
    fn recommend(&self, _request: &OracleRequest) -> Result<String> {
        Ok(String::new())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let movies = catalog::load_catalog(&cli.catalog)
        .with_context(|| format!("Failed to load catalog from {}", cli.catalog.display()))?;
    println!(
        "{} Loaded {} catalog movies in {:?}",
        "✓".green(),
        movies.len(),
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            history,
            mode,
            batch_size,
            liked,
            excluded,
            preferred_actors,
            preferred_directors,
        } => {
            handle_recommend(
                movies,
                &history,
                Mode::parse(&mode),
                batch_size,
                &liked,
                &excluded,
                preferred_actors,
                preferred_directors,
            )
            .await?
        }
        Commands::Profile { history, top } => handle_profile(&movies, &history, top)?,
        Commands::Catalog { limit } => handle_catalog(&movies, limit),
    }

    Ok(())
}

/// Handle the 'recommend' command
#[allow(clippy::too_many_arguments)]
async fn handle_recommend(
    movies: Vec<Movie>,
    history_path: &PathBuf,
    mode: Mode,
    batch_size: usize,
    liked: &[String],
    excluded: &[String],
    preferred_actors: Vec<String>,
    preferred_directors: Vec<String>,
) -> Result<()> {
    let records = history::load_history(history_path)
        .with_context(|| format!("Failed to load history from {}", history_path.display()))?;
    println!("{} Parsed {} watch-history rows", "✓".green(), records.len());

    let mut session = SessionState::from_history(&records);
    session.preferred_actors = preferred_actors;
    session.preferred_directors = preferred_directors;
    for entry in liked {
        let (title, year) = split_title_year(entry);
        session.record_like(title, year);
    }
    for entry in excluded {
        let (title, year) = split_title_year(entry);
        session.record_exclusion(title, year);
    }

    let orchestrator = RecommendationOrchestrator::new(Arc::new(movies), Arc::new(OfflineOracle));
    let batch = orchestrator.get_batch(&session, mode, batch_size).await?;

    print_recommendations(&batch);
    Ok(())
}

/// Handle the 'profile' command
fn handle_profile(movies: &[Movie], history_path: &PathBuf, top: usize) -> Result<()> {
    let records = history::load_history(history_path)
        .with_context(|| format!("Failed to load history from {}", history_path.display()))?;

    let watched_keys = history::watched_key_set(&records);
    let rating_by_key = history::rating_by_key(&records);
    let movie_index = index_by_key(movies);
    let matched = watched_keys
        .iter()
        .filter(|k| movie_index.contains_key(*k))
        .count();
    println!(
        "{} {} of {} watched movies matched the catalog",
        "✓".green(),
        matched,
        watched_keys.len()
    );

    let profiles = build_profiles(
        &watched_keys,
        &rating_by_key,
        &movie_index,
        &Default::default(),
        &[],
        &[],
    );

    print_profile("Genres", &profiles.genre, top);
    print_profile("Actors", &profiles.actor, top);
    print_profile("Directors", &profiles.director, top);
    Ok(())
}

/// Handle the 'catalog' command
fn handle_catalog(movies: &[Movie], limit: usize) {
    println!("{}", "Catalog (highest-rated first):".bold().blue());
    for (rank, movie) in movies.iter().take(limit).enumerate() {
        println!(
            "{}. {} ({}) [{}] imdb {}",
            (rank + 1).to_string().green(),
            movie.title,
            movie.year,
            movie.genres.join(", "),
            movie
                .imdb_rating
                .map(|r| format!("{r:.1}"))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
}

/// Split a "Title (Year)" argument into its parts. Entries without a
/// trailing parenthesized year keep an empty year, matching how keys
/// are built for year-less history rows.
fn split_title_year(entry: &str) -> (&str, &str) {
    let trimmed = entry.trim();
    if let Some(stripped) = trimmed.strip_suffix(')')
        && let Some(open) = stripped.rfind('(')
    {
        let year = stripped[open + 1..].trim();
        if !year.is_empty() && year.chars().all(|c| c.is_ascii_digit()) {
            return (trimmed[..open].trim_end(), year);
        }
    }
    (trimmed, "")
}

fn print_profile(label: &str, profile: &taste::Profile, top: usize) {
    let mut entries: Vec<(&String, &f32)> = profile.iter().collect();
    entries.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("{}", format!("{label}:").bold().blue());
    for (name, weight) in entries.iter().take(top) {
        println!("  {} {name}: {weight:.3}", "•".cyan());
    }
}

fn print_recommendations(batch: &[Recommendation]) {
    println!("{}", "Recommendations:".bold().blue());
    for (rank, rec) in batch.iter().enumerate() {
        let year = if rec.year.is_empty() { "????" } else { &rec.year };
        println!(
            "{}. {} ({}) - Score: {:.4} [{}]",
            (rank + 1).to_string().green(),
            rec.title.bold(),
            year,
            rec.score,
            rec.mode
        );
        if !rec.director.is_empty() {
            println!("   Directed by {}", rec.director);
        }
        if !rec.why_it_fits.is_empty() {
            println!("   {}", rec.why_it_fits.italic());
        }
    }
}
