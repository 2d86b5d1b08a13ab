use crate::error::TaggerError;
use crate::store::{CatalogReader, LinkWriter, TaxonomyStore};
use crate::tagger::{EmotionTagger, TagOutcome};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub links_written: usize,
    pub integrity_failures: usize,
    pub outcomes: Vec<TagOutcome>,
}

impl BatchSummary {
    fn record(&mut self, outcome: TagOutcome) {
        self.processed += 1;
        self.links_written += outcome.links.len();
        self.integrity_failures += outcome.missing.len();
        self.outcomes.push(outcome);
    }
}

async fn load_taxonomy<S>(store: &S) -> Result<HashMap<String, i64>, TaggerError>
where
    S: TaxonomyStore + ?Sized,
{
    let taxonomy = store.emotion_ids().await?;
    if taxonomy.is_empty() {
        return Err(TaggerError::EmptyTaxonomy);
    }
    Ok(taxonomy)
}

/// Tags every movie in the catalog, one at a time.
///
/// An empty catalog or taxonomy aborts before anything is written. Emotions
/// missing from the taxonomy only drop their own link.
pub async fn run_batch<S>(
    store: &S,
    tagger: &EmotionTagger,
    progress_every: usize,
) -> Result<BatchSummary, TaggerError>
where
    S: CatalogReader + TaxonomyStore + LinkWriter + ?Sized,
{
    let movies = store.list_movies().await?;
    if movies.is_empty() {
        return Err(TaggerError::EmptyCatalog);
    }
    let taxonomy = load_taxonomy(store).await?;

    let total = movies.len();
    info!(total, emotions = taxonomy.len(), "starting emotion tagging");

    let mut summary = BatchSummary::default();
    for (i, movie) in movies.iter().enumerate() {
        let outcome = tagger.tag_movie(store, movie, &taxonomy).await?;
        let emotions: Vec<String> = outcome
            .links
            .iter()
            .map(|l| format!("{} ({:.2})", l.emotion, l.score))
            .collect();
        info!(
            "[{}/{}] '{}' tagged: {}",
            i + 1,
            total,
            movie.title,
            emotions.join(", ")
        );
        if !outcome.missing.is_empty() {
            warn!(
                tmdb_id = movie.tmdb_id,
                missing = outcome.missing.len(),
                "some emotions were not registered"
            );
        }
        summary.record(outcome);

        if progress_every > 0 && (i + 1) % progress_every == 0 {
            info!("{}/{} movies processed", i + 1, total);
        }
    }

    info!(
        processed = summary.processed,
        links = summary.links_written,
        integrity_failures = summary.integrity_failures,
        "emotion tagging complete"
    );
    Ok(summary)
}

/// Retags a single movie by its catalog id.
pub async fn tag_one<S>(
    store: &S,
    tagger: &EmotionTagger,
    tmdb_id: i64,
) -> Result<TagOutcome, TaggerError>
where
    S: CatalogReader + TaxonomyStore + LinkWriter + ?Sized,
{
    let movie = store
        .movie_by_tmdb_id(tmdb_id)
        .await?
        .ok_or(TaggerError::MovieNotFound(tmdb_id))?;
    let taxonomy = load_taxonomy(store).await?;
    let outcome = tagger.tag_movie(store, &movie, &taxonomy).await?;
    info!(
        tmdb_id,
        title = %movie.title,
        links = outcome.links.len(),
        "movie retagged"
    );
    Ok(outcome)
}
