//! MoodMeal CLI
//!
//! Command-line interface for MoodMeal operations:
//! - Create a database and seed it from CSV
//! - Print any of the insight reports as JSON
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use moodmeal::config::{generate_default_config, Config};
use moodmeal::insights::{CalendarQuery, InsightsEngine};
use moodmeal::store::{MealCsvImporter, SqliteStore, UserId};
use moodmeal::swaps::SwapHistoryService;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "moodmeal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Meal and mood insights from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database (default: from config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database schema
    Init,

    /// Import meals from CSV
    Import {
        /// Path to CSV file
        path: PathBuf,
        /// User for rows with an empty user_id column
        #[arg(long)]
        user: Option<i64>,
        /// Dry run (don't actually import)
        #[arg(long)]
        dry_run: bool,
    },

    /// Mood calendar
    Calendar {
        #[arg(short, long)]
        user: i64,
        /// Range start (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start: Option<String>,
        /// Range end (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        end: Option<String>,
    },

    /// Mood-boosting foods and weekly trend
    Patterns {
        #[arg(short, long)]
        user: i64,
    },

    /// Streak, balanced days and new foods
    Achievements {
        #[arg(short, long)]
        user: i64,
    },

    /// Craving swaps with a given satisfaction rating
    Swaps {
        #[arg(short, long)]
        user: i64,
        /// Satisfaction rating (1-5)
        #[arg(short, long)]
        rating: i64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing config to {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::from_env(),
    };
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.db_path));

    let store = Arc::new(
        SqliteStore::open(&db_path).with_context(|| format!("opening database {:?}", db_path))?,
    );
    let engine = InsightsEngine::with_system_clock(store.clone(), config.insights.clone());

    match cli.command {
        Commands::Init => {
            println!("Database ready at {:?}", db_path);
        }

        Commands::Import {
            path,
            user,
            dry_run,
        } => {
            if !path.exists() {
                bail!("File not found: {:?}", path);
            }

            let mut importer = MealCsvImporter::new();
            if let Some(id) = user {
                importer = importer.with_default_user(UserId(id));
            }

            let result = importer.import(&path)?;

            println!("Import results:");
            println!("  Rows processed: {}", result.rows_processed);
            println!("  Rows failed: {}", result.rows_failed);
            println!("  Meals: {}", result.meals.len());

            if !result.errors.is_empty() {
                println!();
                println!("Errors (first 10):");
                for error in result.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }

            if dry_run {
                println!();
                println!("(Dry run - no data was imported)");
            } else {
                let mut imported = 0;
                for meal in result.meals {
                    store.insert_meal(meal).await?;
                    imported += 1;
                }
                println!("  Imported: {}", imported);
            }
        }

        Commands::Calendar { user, start, end } => {
            let query = CalendarQuery::parse(start.as_deref(), end.as_deref())?;
            print_json(&engine.calendar(UserId(user), &query).await?)?;
        }

        Commands::Patterns { user } => {
            print_json(&engine.patterns(UserId(user)).await?)?;
        }

        Commands::Achievements { user } => {
            print_json(&engine.achievements(UserId(user)).await?)?;
        }

        Commands::Swaps { user, rating } => {
            let service = SwapHistoryService::new(store.clone());
            print_json(&service.by_satisfaction(UserId(user), Some(rating)).await?)?;
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
