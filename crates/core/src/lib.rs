//! Core library: emotion taxonomy, heuristic movie tagging, catalog loading and storage seams.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod tagger;
pub mod taxonomy;

pub use error::TaggerError;
pub use tagger::{EmotionTagger, TagOutcome};
pub use taxonomy::Emotion;
