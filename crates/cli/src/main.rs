use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clou_cli::report;
use clou_core::catalog;
use clou_core::config::{self, AppConfig};
use clou_core::pipeline;
use clou_core::store::SqliteStore;
use clou_core::{EmotionTagger, TaggerError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Seed { file } => run_seed(cfg, file).await,
        Commands::Import { file, json } => run_import(cfg, file, json).await,
        Commands::Tag { tmdb_id, json } => run_tag(cfg, tmdb_id, json).await,
        Commands::Emotions { json } => run_emotions(cfg, json).await,
        Commands::MovieEmotions { tmdb_id, json } => run_movie_emotions(cfg, tmdb_id, json).await,
        Commands::EmotionMovies { name, json } => run_emotion_movies(cfg, name, json).await,
    }
}

#[derive(Parser)]
#[command(name = "clou")]
#[command(about = "Emotion tagging for the movie diary catalog", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the emotion taxonomy (built-in, or from a TOML file)
    Seed {
        /// TOML file with [[emotions]] entries
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Import movies from a JSON array, upserting by tmdb_id
    Import {
        file: PathBuf,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Recompute emotion links for every movie, or a single one
    Tag {
        /// Only retag the movie with this TMDB id
        #[arg(long)]
        tmdb_id: Option<i64>,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// List the emotion taxonomy with linked movie counts
    Emotions {
        #[arg(long)]
        json: bool,
    },
    /// Show the emotions linked to a movie, best first
    MovieEmotions {
        tmdb_id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Show the movies linked to an emotion, best first
    EmotionMovies {
        name: String,
        #[arg(long)]
        json: bool,
    },
}

async fn open_store(cfg: &AppConfig) -> Result<SqliteStore> {
    let pool = storage::open(&cfg.database.path)
        .await
        .with_context(|| format!("open database {}", cfg.database.path))?;
    Ok(SqliteStore::new(pool))
}

fn print_lines(lines: Vec<String>, empty: &str) {
    if lines.is_empty() {
        println!("{empty}");
    }
    for line in lines {
        println!("{line}");
    }
}

async fn run_seed(cfg: AppConfig, file: Option<PathBuf>) -> Result<()> {
    let store = open_store(&cfg).await?;
    let seeds = match file {
        Some(path) => catalog::load_seeds_from_file(&path)
            .with_context(|| format!("read seed file {}", path.display()))?,
        None => catalog::default_seeds(),
    };
    let inserted = catalog::seed_emotions(&store, &seeds).await?;
    println!("seed: {} new emotions, {} total in file", inserted, seeds.len());
    Ok(())
}

async fn run_import(cfg: AppConfig, file: PathBuf, json: bool) -> Result<()> {
    let store = open_store(&cfg).await?;
    let summary = catalog::import_movies(&store, &file)
        .await
        .with_context(|| format!("import {}", file.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", report::import_line(&summary));
    }
    Ok(())
}

async fn run_tag(cfg: AppConfig, tmdb_id: Option<i64>, json: bool) -> Result<()> {
    let store = open_store(&cfg).await?;
    let tagger = EmotionTagger::new(&cfg.tagging);

    if let Some(id) = tmdb_id {
        let outcome = pipeline::tag_one(&store, &tagger, id).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            println!("{}", report::outcome_line(&outcome));
        }
        return Ok(());
    }

    let summary = match pipeline::run_batch(&store, &tagger, cfg.tagging.progress_every).await {
        Ok(summary) => summary,
        Err(e) if e.is_precondition() => {
            return Err(anyhow::Error::new(e).context("tagging aborted, nothing was written"));
        }
        Err(e) => return Err(e.into()),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report::batch_json(&summary))?);
    } else {
        println!("{}", report::batch_line(&summary));
    }
    Ok(())
}

async fn run_emotions(cfg: AppConfig, json: bool) -> Result<()> {
    let store = open_store(&cfg).await?;
    let emotions = store.emotion_summaries().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&emotions)?);
    } else {
        print_lines(
            report::emotion_lines(&emotions),
            "no emotions registered; run `clou seed`",
        );
    }
    Ok(())
}

async fn run_movie_emotions(cfg: AppConfig, tmdb_id: i64, json: bool) -> Result<()> {
    let store = open_store(&cfg).await?;
    let links = store.emotions_for_movie(tmdb_id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        print_lines(report::movie_emotion_lines(&links), "no emotions linked yet");
    }
    Ok(())
}

async fn run_emotion_movies(cfg: AppConfig, name: String, json: bool) -> Result<()> {
    let store = open_store(&cfg).await?;
    let movies = match store.movies_for_emotion(&name).await {
        Ok(movies) => movies,
        Err(TaggerError::UnknownEmotion(name)) => {
            anyhow::bail!("emotion '{name}' not found; see `clou emotions`")
        }
        Err(e) => return Err(e.into()),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&movies)?);
    } else {
        print_lines(report::emotion_movie_lines(&movies), "no movies linked yet");
    }
    Ok(())
}
