use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("movie catalog is empty; import movies before tagging")]
    EmptyCatalog,
    #[error("emotion taxonomy is empty; seed emotions before tagging")]
    EmptyTaxonomy,
    #[error("emotion `{0}` is not registered in the taxonomy")]
    UnknownEmotion(String),
    #[error("movie with tmdb id {0} not found")]
    MovieNotFound(i64),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl TaggerError {
    /// Precondition failures abort a batch before anything is written.
    pub fn is_precondition(&self) -> bool {
        matches!(self, TaggerError::EmptyCatalog | TaggerError::EmptyTaxonomy)
    }
}
