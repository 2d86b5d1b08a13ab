//! Loading reference data: the emotion taxonomy and the movie catalog.

use crate::error::TaggerError;
use crate::models::NewMovie;
use crate::store::SqliteStore;
use crate::taxonomy::Emotion;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionSeed {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    emotions: Vec<EmotionSeed>,
}

/// The built-in taxonomy.
pub fn default_seeds() -> Vec<EmotionSeed> {
    Emotion::ALL
        .iter()
        .map(|e| EmotionSeed {
            name: e.as_str().to_string(),
            description: format!("{} ({})", e.description(), e.korean_label()),
        })
        .collect()
}

/// Reads `[[emotions]]` entries from a TOML file.
pub fn load_seeds_from_file(path: &Path) -> Result<Vec<EmotionSeed>, TaggerError> {
    let content = fs::read_to_string(path)?;
    let file: SeedFile = toml::from_str(&content)?;
    let mut seeds = Vec::with_capacity(file.emotions.len());
    for seed in file.emotions {
        if seed.name.trim().is_empty() {
            return Err(TaggerError::InvalidRecord(format!(
                "empty emotion name in {}",
                path.display()
            )));
        }
        let name = canonical_name(&seed.name);
        if name.parse::<Emotion>().is_err() {
            warn!(%name, "emotion is outside the tagger's taxonomy and will never be assigned");
        }
        seeds.push(EmotionSeed {
            name,
            description: seed.description,
        });
    }
    Ok(seeds)
}

/// Taxonomy members (English in any case, or the Korean label) map to the
/// name the tagger looks up; anything else is only trimmed.
pub fn canonical_name(name: &str) -> String {
    match name.parse::<Emotion>() {
        Ok(emotion) => emotion.as_str().to_string(),
        Err(_) => name.trim().to_string(),
    }
}

/// Registers missing emotions; existing names are left untouched.
/// Returns how many were inserted.
pub async fn seed_emotions(store: &SqliteStore, seeds: &[EmotionSeed]) -> Result<usize, TaggerError> {
    let mut inserted = 0;
    for seed in seeds {
        if store
            .insert_emotion(&canonical_name(&seed.name), &seed.description)
            .await?
        {
            inserted += 1;
        }
    }
    info!(inserted, total = seeds.len(), "emotion taxonomy seeded");
    Ok(inserted)
}

/// Either `"Drama, Crime"` or `["Drama", "Crime"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    fn joined(self) -> String {
        match self {
            TextOrList::Text(s) => s,
            TextOrList::List(items) => items.join(", "),
        }
    }
}

/// One movie as found in an import file.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieImport {
    pub tmdb_id: i64,
    pub title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    genres: Option<TextOrList>,
    #[serde(default)]
    keywords: Option<TextOrList>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    release_date: Option<String>,
}

impl TryFrom<MovieImport> for NewMovie {
    type Error = TaggerError;

    fn try_from(raw: MovieImport) -> Result<Self, Self::Error> {
        if raw.title.trim().is_empty() {
            return Err(TaggerError::InvalidRecord(format!(
                "movie {} has an empty title",
                raw.tmdb_id
            )));
        }
        let release_date = match raw.release_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(date) => {
                NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                    TaggerError::InvalidRecord(format!(
                        "movie {}: bad release_date {date:?}: {e}",
                        raw.tmdb_id
                    ))
                })?;
                Some(date.to_string())
            }
        };
        Ok(NewMovie {
            tmdb_id: raw.tmdb_id,
            title: raw.title,
            overview: raw.overview.unwrap_or_default(),
            tagline: raw.tagline.unwrap_or_default(),
            genres: raw.genres.map(TextOrList::joined).unwrap_or_default(),
            keywords: raw.keywords.map(TextOrList::joined).unwrap_or_default(),
            poster_path: raw.poster_path.unwrap_or_default(),
            vote_average: raw.vote_average,
            release_date,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub upserted: usize,
    pub skipped: usize,
}

/// Parses a JSON array of movies.
pub fn parse_movies(json: &str) -> Result<Vec<MovieImport>, TaggerError> {
    Ok(serde_json::from_str(json)?)
}

/// Upserts every valid movie of a JSON file by `tmdb_id` in one transaction.
/// Invalid records are skipped with a warning.
pub async fn import_movies(store: &SqliteStore, path: &Path) -> Result<ImportSummary, TaggerError> {
    let content = fs::read_to_string(path)?;
    let records = parse_movies(&content)?;

    let mut summary = ImportSummary::default();
    let mut tx = store.pool().begin().await?;
    for raw in records {
        match NewMovie::try_from(raw) {
            Ok(movie) => {
                SqliteStore::upsert_movie_tx(&mut tx, &movie).await?;
                summary.upserted += 1;
            }
            Err(e) => {
                warn!("skipping movie: {e}");
                summary.skipped += 1;
            }
        }
    }
    tx.commit().await?;

    info!(
        upserted = summary.upserted,
        skipped = summary.skipped,
        path = %path.display(),
        "movie catalog imported"
    );
    Ok(summary)
}
