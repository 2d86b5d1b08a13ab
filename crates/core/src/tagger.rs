//! Heuristic emotion tagging of movies from their free-text metadata.
//!
//! Scoring is a pure function of the four text fields (see [`EmotionTagger::score`]);
//! [`EmotionTagger::tag_movie`] adds taxonomy resolution and the atomic link replace.

use crate::config::{TaggingConfig, MAX_EMOTIONS_CAP, MIN_SCORE_FLOOR};
use crate::error::TaggerError;
use crate::models::{Movie, NewLink, ScoredEmotion};
use crate::store::LinkWriter;
use crate::taxonomy::{self, Emotion};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub const KEYWORD_WEIGHT: f64 = 0.2;
pub const GENRE_WEIGHT: f64 = 0.3;
pub const TITLE_WEIGHT: f64 = 0.4;
pub const MAX_SCORE: f64 = 1.0;

/// Below this many distinct emotions the genre fallback kicks in.
const MIN_DISTINCT_EMOTIONS: usize = 2;
const PHRASE_SEPARATOR: &str = ", ";

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word pattern"));

/// Accumulated score per emotion.
pub type ScoreTable = BTreeMap<Emotion, f64>;

/// The text fields the tagger reads from a movie.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovieText<'a> {
    pub title: &'a str,
    pub genres: &'a str,
    pub keywords: &'a str,
    pub overview: &'a str,
}

impl<'a> From<&'a Movie> for MovieText<'a> {
    fn from(movie: &'a Movie) -> Self {
        Self {
            title: &movie.title,
            genres: &movie.genres,
            keywords: &movie.keywords,
            overview: &movie.overview,
        }
    }
}

/// Keyword phrases, then genre phrases, then overview words; all lower-cased.
pub fn tokenize(text: &MovieText<'_>) -> Vec<String> {
    let mut tokens = split_phrases(text.keywords);
    tokens.extend(split_phrases(text.genres));
    if !text.overview.is_empty() {
        let overview = text.overview.to_lowercase();
        tokens.extend(WORD.find_iter(&overview).map(|m| m.as_str().to_string()));
    }
    tokens
}

fn split_phrases(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field
        .to_lowercase()
        .split(PHRASE_SEPARATOR)
        .map(str::to_string)
        .collect()
}

fn add(scores: &mut ScoreTable, emotion: Emotion, weight: f64) {
    *scores.entry(emotion).or_insert(0.0) += weight;
}

/// Token matches against both tables plus the title substring pass.
pub fn accumulate(text: &MovieText<'_>) -> ScoreTable {
    let mut scores = ScoreTable::new();

    for token in tokenize(text) {
        if let Some(emotion) = taxonomy::keyword_emotion(&token) {
            add(&mut scores, emotion, KEYWORD_WEIGHT);
        }
        if let Some(emotion) = taxonomy::genre_emotion(&token) {
            add(&mut scores, emotion, GENRE_WEIGHT);
        }
    }

    let title = text.title.to_lowercase();
    for (keyword, emotion) in taxonomy::KEYWORD_EMOTIONS {
        if title.contains(keyword) {
            add(&mut scores, *emotion, TITLE_WEIGHT);
        }
    }

    scores
}

/// Adds the genre-driven fallback boosts when fewer than two emotions scored.
/// Additive: an emotion already present keeps its score plus the boost.
pub fn apply_fallback(scores: &mut ScoreTable, genres: &str) -> bool {
    if scores.len() >= MIN_DISTINCT_EMOTIONS {
        return false;
    }
    for (emotion, weight) in taxonomy::fallback_boosts(&genres.to_lowercase()) {
        add(scores, emotion, weight);
    }
    true
}

/// Clamps to [`MAX_SCORE`], drops scores under `min_score`, ranks by score
/// descending then name ascending, keeps the first `max_emotions`.
pub fn select(scores: &ScoreTable, min_score: f64, max_emotions: usize) -> Vec<ScoredEmotion> {
    let mut ranked: Vec<ScoredEmotion> = scores
        .iter()
        .map(|(&emotion, &score)| ScoredEmotion {
            emotion,
            score: score.min(MAX_SCORE),
        })
        .filter(|s| s.score >= min_score)
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.emotion.as_str().cmp(b.emotion.as_str()))
    });
    ranked.truncate(max_emotions);
    ranked
}

/// Result of tagging one movie.
#[derive(Debug, Clone, Serialize)]
pub struct TagOutcome {
    pub movie_id: i64,
    pub tmdb_id: i64,
    pub title: String,
    /// Links actually written, best first.
    pub links: Vec<ScoredEmotion>,
    /// Selected emotions that are not registered in the taxonomy store.
    pub missing: Vec<Emotion>,
}

#[derive(Debug, Clone)]
pub struct EmotionTagger {
    min_score: f64,
    max_emotions: usize,
}

impl Default for EmotionTagger {
    fn default() -> Self {
        Self::new(&TaggingConfig::default())
    }
}

impl EmotionTagger {
    /// Limits outside the persisted bounds are pulled back into them.
    pub fn new(config: &TaggingConfig) -> Self {
        Self {
            min_score: config.min_score.max(MIN_SCORE_FLOOR),
            max_emotions: config.max_emotions.min(MAX_EMOTIONS_CAP),
        }
    }

    pub fn score(&self, text: &MovieText<'_>) -> Vec<ScoredEmotion> {
        let mut scores = accumulate(text);
        if apply_fallback(&mut scores, text.genres) {
            debug!(title = text.title, "low signal, applied genre fallback");
        }
        select(&scores, self.min_score, self.max_emotions)
    }

    /// Scores `movie` and replaces its links. `taxonomy` maps registered
    /// emotion names to row ids; selected emotions absent from it are skipped
    /// and reported in [`TagOutcome::missing`].
    pub async fn tag_movie<W>(
        &self,
        writer: &W,
        movie: &Movie,
        taxonomy: &HashMap<String, i64>,
    ) -> Result<TagOutcome, TaggerError>
    where
        W: LinkWriter + ?Sized,
    {
        let selected = self.score(&MovieText::from(movie));

        let mut links = Vec::with_capacity(selected.len());
        let mut drafts = Vec::with_capacity(selected.len());
        let mut missing = Vec::new();
        for scored in selected {
            match taxonomy.get(scored.emotion.as_str()) {
                Some(&emotion_id) => {
                    drafts.push(NewLink {
                        emotion_id,
                        score: scored.score,
                    });
                    links.push(scored);
                }
                None => {
                    let err = TaggerError::UnknownEmotion(scored.emotion.to_string());
                    warn!(movie = %movie.title, tmdb_id = movie.tmdb_id, "{err}; skipping link");
                    missing.push(scored.emotion);
                }
            }
        }

        writer.replace_links(movie.id, &drafts).await?;
        for link in &links {
            debug!(movie = %movie.title, emotion = %link.emotion, score = link.score, "linked");
        }

        Ok(TagOutcome {
            movie_id: movie.id,
            tmdb_id: movie.tmdb_id,
            title: movie.title.clone(),
            links,
            missing,
        })
    }
}
