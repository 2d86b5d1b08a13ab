//! Operator-facing rendering of command results, as text lines or JSON.

use clou_core::catalog::ImportSummary;
use clou_core::models::{EmotionMovieView, EmotionSummary, MovieEmotionView};
use clou_core::pipeline::BatchSummary;
use clou_core::TagOutcome;
use serde_json::{json, Value};

pub fn outcome_line(outcome: &TagOutcome) -> String {
    let links = if outcome.links.is_empty() {
        "no emotions".to_string()
    } else {
        outcome
            .links
            .iter()
            .map(|l| format!("{} {:.2}", l.emotion, l.score))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut line = format!("'{}' ({}): {}", outcome.title, outcome.tmdb_id, links);
    if !outcome.missing.is_empty() {
        let missing: Vec<&str> = outcome.missing.iter().map(|e| e.as_str()).collect();
        line.push_str(&format!(" [unregistered: {}]", missing.join(", ")));
    }
    line
}

pub fn batch_line(summary: &BatchSummary) -> String {
    format!(
        "tag: processed {} movies, wrote {} links, {} integrity failures",
        summary.processed, summary.links_written, summary.integrity_failures
    )
}

pub fn batch_json(summary: &BatchSummary) -> Value {
    json!({
        "status": "ok",
        "mode": "tag",
        "processed": summary.processed,
        "links_written": summary.links_written,
        "integrity_failures": summary.integrity_failures,
        "movies": summary.outcomes,
    })
}

pub fn import_line(summary: &ImportSummary) -> String {
    format!(
        "import: upserted {}, skipped {}",
        summary.upserted, summary.skipped
    )
}

pub fn emotion_lines(emotions: &[EmotionSummary]) -> Vec<String> {
    emotions
        .iter()
        .map(|e| {
            if e.description.is_empty() {
                format!("{:<10} {:>4} movies", e.name, e.movie_count)
            } else {
                format!("{:<10} {:>4} movies  {}", e.name, e.movie_count, e.description)
            }
        })
        .collect()
}

pub fn movie_emotion_lines(links: &[MovieEmotionView]) -> Vec<String> {
    links
        .iter()
        .map(|l| format!("{:<10} {:.2}", l.emotion, l.score))
        .collect()
}

pub fn emotion_movie_lines(movies: &[EmotionMovieView]) -> Vec<String> {
    movies
        .iter()
        .map(|m| match m.vote_average {
            Some(vote) => format!("{:.2}  {} ({}) ★{:.1}", m.score, m.title, m.tmdb_id, vote),
            None => format!("{:.2}  {} ({})", m.score, m.title, m.tmdb_id),
        })
        .collect()
}
