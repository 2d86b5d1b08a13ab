//! Collaborator seams of the tagger and their SQLite implementation.

use crate::error::TaggerError;
use crate::models::{
    EmotionMovieView, EmotionRecord, EmotionSummary, Movie, MovieEmotionView, NewLink, NewMovie,
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

const MOVIE_COLUMNS: &str = "id, tmdb_id, title, overview, tagline, genres, keywords, poster_path, vote_average, release_date";

/// Read-only access to the movie catalog.
#[async_trait::async_trait]
pub trait CatalogReader: Send + Sync {
    async fn list_movies(&self) -> Result<Vec<Movie>, TaggerError>;
    async fn movie_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>, TaggerError>;
}

/// Read-only access to the registered emotions.
#[async_trait::async_trait]
pub trait TaxonomyStore: Send + Sync {
    async fn registered_emotions(&self) -> Result<Vec<EmotionRecord>, TaggerError>;

    /// Registered names mapped to row ids.
    async fn emotion_ids(&self) -> Result<HashMap<String, i64>, TaggerError> {
        Ok(self
            .registered_emotions()
            .await?
            .into_iter()
            .map(|e| (e.name, e.id))
            .collect())
    }
}

/// Writes a movie's links. `replace_links` is atomic: either every old link
/// is gone and every new one present, or nothing changed.
#[async_trait::async_trait]
pub trait LinkWriter: Send + Sync {
    async fn replace_links(&self, movie_id: i64, links: &[NewLink]) -> Result<usize, TaggerError>;
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts or updates a movie by `tmdb_id`, returning its row id.
    pub async fn upsert_movie_tx(
        tx: &mut Transaction<'_, Sqlite>,
        movie: &NewMovie,
    ) -> Result<i64, TaggerError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO movies (tmdb_id, title, overview, tagline, genres, keywords, poster_path, vote_average, release_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(tmdb_id) DO UPDATE SET
                title = excluded.title,
                overview = excluded.overview,
                tagline = excluded.tagline,
                genres = excluded.genres,
                keywords = excluded.keywords,
                poster_path = excluded.poster_path,
                vote_average = excluded.vote_average,
                release_date = excluded.release_date
            RETURNING id
            "#,
        )
        .bind(movie.tmdb_id)
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(&movie.tagline)
        .bind(&movie.genres)
        .bind(&movie.keywords)
        .bind(&movie.poster_path)
        .bind(movie.vote_average)
        .bind(&movie.release_date)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    pub async fn upsert_movie(&self, movie: &NewMovie) -> Result<i64, TaggerError> {
        let mut tx = self.pool.begin().await?;
        let id = Self::upsert_movie_tx(&mut tx, movie).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Registers an emotion unless the name exists. Returns true when inserted.
    pub async fn insert_emotion(&self, name: &str, description: &str) -> Result<bool, TaggerError> {
        let res = sqlx::query(
            "INSERT INTO emotions (name, description) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn delete_links_tx(
        tx: &mut Transaction<'_, Sqlite>,
        movie_id: i64,
    ) -> Result<u64, TaggerError> {
        let res = sqlx::query("DELETE FROM movie_emotions WHERE movie_id = ?1")
            .bind(movie_id)
            .execute(&mut **tx)
            .await?;
        Ok(res.rows_affected())
    }

    pub async fn insert_link_tx(
        tx: &mut Transaction<'_, Sqlite>,
        movie_id: i64,
        link: &NewLink,
    ) -> Result<(), TaggerError> {
        sqlx::query(
            r#"
            INSERT INTO movie_emotions (movie_id, emotion_id, score, tagged_at)
            VALUES (?1, ?2, ?3, strftime('%s','now'))
            "#,
        )
        .bind(movie_id)
        .bind(link.emotion_id)
        .bind(link.score)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn emotion_summaries(&self) -> Result<Vec<EmotionSummary>, TaggerError> {
        let rows = sqlx::query_as::<_, EmotionSummary>(
            r#"
            SELECT e.id, e.name, e.description, COUNT(me.id) AS movie_count
            FROM emotions e
            LEFT JOIN movie_emotions me ON me.emotion_id = e.id
            GROUP BY e.id, e.name, e.description
            ORDER BY e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Emotions linked to a movie, best score first.
    pub async fn emotions_for_movie(&self, tmdb_id: i64) -> Result<Vec<MovieEmotionView>, TaggerError> {
        let movie = self
            .movie_by_tmdb_id(tmdb_id)
            .await?
            .ok_or(TaggerError::MovieNotFound(tmdb_id))?;
        let rows = sqlx::query_as::<_, MovieEmotionView>(
            r#"
            SELECT e.name AS emotion, me.score
            FROM movie_emotions me
            JOIN emotions e ON e.id = me.emotion_id
            WHERE me.movie_id = ?1
            ORDER BY me.score DESC, e.name ASC
            "#,
        )
        .bind(movie.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Movies linked to an emotion, best score first.
    pub async fn movies_for_emotion(&self, name: &str) -> Result<Vec<EmotionMovieView>, TaggerError> {
        let emotion_id: Option<i64> = sqlx::query_scalar("SELECT id FROM emotions WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        let emotion_id = emotion_id.ok_or_else(|| TaggerError::UnknownEmotion(name.to_string()))?;
        let rows = sqlx::query_as::<_, EmotionMovieView>(
            r#"
            SELECT m.tmdb_id, m.title, m.poster_path, m.vote_average, me.score
            FROM movie_emotions me
            JOIN movies m ON m.id = me.movie_id
            WHERE me.emotion_id = ?1
            ORDER BY me.score DESC, m.tmdb_id ASC
            "#,
        )
        .bind(emotion_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl CatalogReader for SqliteStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, TaggerError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id");
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn movie_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>, TaggerError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE tmdb_id = ?1");
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(tmdb_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }
}

#[async_trait::async_trait]
impl TaxonomyStore for SqliteStore {
    async fn registered_emotions(&self) -> Result<Vec<EmotionRecord>, TaggerError> {
        let rows = sqlx::query_as::<_, EmotionRecord>(
            "SELECT id, name, description FROM emotions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl LinkWriter for SqliteStore {
    async fn replace_links(&self, movie_id: i64, links: &[NewLink]) -> Result<usize, TaggerError> {
        // Dropping `tx` on an early return rolls back.
        let mut tx = self.pool.begin().await?;
        Self::delete_links_tx(&mut tx, movie_id).await?;
        for link in links {
            Self::insert_link_tx(&mut tx, movie_id, link).await?;
        }
        tx.commit().await?;
        Ok(links.len())
    }
}
