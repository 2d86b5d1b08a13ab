use crate::taxonomy::Emotion;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: i64,
    pub tmdb_id: i64,
    pub title: String,
    pub overview: String,
    pub tagline: String,
    pub genres: String,
    pub keywords: String,
    pub poster_path: String,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
}

/// Catalog fields written on import, keyed by `tmdb_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMovie {
    pub tmdb_id: i64,
    pub title: String,
    pub overview: String,
    pub tagline: String,
    pub genres: String,
    pub keywords: String,
    pub poster_path: String,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmotionRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredEmotion {
    pub emotion: Emotion,
    pub score: f64,
}

/// A link ready to be written: the emotion already resolved to its row id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewLink {
    pub emotion_id: i64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmotionSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub movie_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovieEmotionView {
    pub emotion: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmotionMovieView {
    pub tmdb_id: i64,
    pub title: String,
    pub poster_path: String,
    pub vote_average: Option<f64>,
    pub score: f64,
}
