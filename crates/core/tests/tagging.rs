use clou_core::catalog::{self, EmotionSeed};
use clou_core::models::{NewLink, NewMovie};
use clou_core::pipeline;
use clou_core::store::{LinkWriter, SqliteStore, TaxonomyStore};
use clou_core::{Emotion, EmotionTagger, TaggerError};

async fn empty_store() -> SqliteStore {
    let pool = storage::open("sqlite::memory:").await.unwrap();
    SqliteStore::new(pool)
}

async fn seeded_store() -> SqliteStore {
    let store = empty_store().await;
    catalog::seed_emotions(&store, &catalog::default_seeds())
        .await
        .unwrap();
    store
}

fn movie(tmdb_id: i64, title: &str, genres: &str, keywords: &str, overview: &str) -> NewMovie {
    NewMovie {
        tmdb_id,
        title: title.to_string(),
        genres: genres.to_string(),
        keywords: keywords.to_string(),
        overview: overview.to_string(),
        ..Default::default()
    }
}

async fn links_of(store: &SqliteStore, tmdb_id: i64) -> Vec<(String, f64)> {
    store
        .emotions_for_movie(tmdb_id)
        .await
        .unwrap()
        .into_iter()
        .map(|v| (v.emotion, v.score))
        .collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn batch_is_idempotent() {
    let store = seeded_store().await;
    store
        .upsert_movie(&movie(
            1,
            "Parasite",
            "Comedy, Thriller, Drama",
            "class, twist, revenge",
            "A poor family schemes to become employed by a wealthy family.",
        ))
        .await
        .unwrap();
    store
        .upsert_movie(&movie(2, "A Love Story", "", "", ""))
        .await
        .unwrap();

    let tagger = EmotionTagger::default();
    let first = pipeline::run_batch(&store, &tagger, 10).await.unwrap();
    let after_first = (links_of(&store, 1).await, links_of(&store, 2).await);

    let second = pipeline::run_batch(&store, &tagger, 10).await.unwrap();
    let after_second = (links_of(&store, 1).await, links_of(&store, 2).await);

    assert_eq!(first.processed, 2);
    assert_eq!(first.links_written, second.links_written);
    assert_eq!(after_first, after_second);
    assert!(!after_first.0.is_empty());
}

#[tokio::test]
async fn persisted_scores_and_counts_are_bounded() {
    let store = seeded_store().await;
    let fixtures = [
        movie(
            10,
            "Love, Revenge and Ghosts",
            "Romance, Horror, Thriller, Comedy, War, Adventure",
            "love, kiss, revenge, ghost, twist, hope",
            "A tragic love story full of fury, hope and terror.",
        ),
        movie(11, "Untitled", "", "", ""),
        movie(12, "복수의 꿈", "드라마, 범죄", "복수, 눈물", "슬픈 이야기"),
    ];
    for m in &fixtures {
        store.upsert_movie(m).await.unwrap();
    }

    pipeline::run_batch(&store, &EmotionTagger::default(), 0)
        .await
        .unwrap();

    for m in &fixtures {
        let links = links_of(&store, m.tmdb_id).await;
        assert!(!links.is_empty(), "{} has no links", m.title);
        assert!(links.len() <= 5, "{} has {} links", m.title, links.len());
        for (emotion, score) in &links {
            assert!(
                (0.2..=1.0).contains(score),
                "{}: {emotion} scored {score}",
                m.title
            );
        }
    }
    assert_eq!(links_of(&store, 10).await.len(), 5);
}

#[tokio::test]
async fn rerun_replaces_instead_of_merging() {
    let store = seeded_store().await;
    let movie_id = store
        .upsert_movie(&movie(20, "Before", "Comedy, Drama", "", ""))
        .await
        .unwrap();

    let ids = store.emotion_ids().await.unwrap();
    store
        .replace_links(
            movie_id,
            &[
                NewLink {
                    emotion_id: ids["happiness"],
                    score: 0.9,
                },
                NewLink {
                    emotion_id: ids["sadness"],
                    score: 0.3,
                },
            ],
        )
        .await
        .unwrap();

    // New metadata only yields the horror fallback.
    store
        .upsert_movie(&movie(20, "Untitled", "Horror Comedy", "", ""))
        .await
        .unwrap();
    let outcome = pipeline::tag_one(&store, &EmotionTagger::default(), 20)
        .await
        .unwrap();
    assert_eq!(outcome.links.len(), 2);

    let links = links_of(&store, 20).await;
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].0, "fear");
    assert!(approx(links[0].1, 0.5));
    assert_eq!(links[1].0, "tension");
    assert!(approx(links[1].1, 0.3));
}

#[tokio::test]
async fn empty_catalog_aborts_before_writing() {
    let store = seeded_store().await;
    let err = pipeline::run_batch(&store, &EmotionTagger::default(), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, TaggerError::EmptyCatalog));
    assert!(err.is_precondition());
}

#[tokio::test]
async fn empty_taxonomy_aborts_before_writing() {
    let store = empty_store().await;
    store
        .upsert_movie(&movie(30, "A Love Story", "", "", ""))
        .await
        .unwrap();

    let err = pipeline::run_batch(&store, &EmotionTagger::default(), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, TaggerError::EmptyTaxonomy));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movie_emotions")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn unregistered_emotion_only_drops_its_pair() {
    let store = empty_store().await;
    let seeds: Vec<EmotionSeed> = catalog::default_seeds()
        .into_iter()
        .filter(|s| s.name != "tension")
        .collect();
    catalog::seed_emotions(&store, &seeds).await.unwrap();

    store
        .upsert_movie(&movie(40, "Untitled", "Horror Comedy", "", ""))
        .await
        .unwrap();
    store
        .upsert_movie(&movie(41, "A Love Story", "", "", ""))
        .await
        .unwrap();

    let summary = pipeline::run_batch(&store, &EmotionTagger::default(), 1)
        .await
        .unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.integrity_failures, 1);
    assert_eq!(summary.outcomes[0].missing, vec![Emotion::Tension]);

    let horror = links_of(&store, 40).await;
    assert_eq!(horror.len(), 1);
    assert_eq!(horror[0].0, "fear");
    assert_eq!(links_of(&store, 41).await.len(), 3);
}

#[tokio::test]
async fn failed_replace_keeps_previous_links() {
    let store = seeded_store().await;
    let movie_id = store
        .upsert_movie(&movie(50, "Kept", "", "", ""))
        .await
        .unwrap();
    let ids = store.emotion_ids().await.unwrap();
    store
        .replace_links(
            movie_id,
            &[NewLink {
                emotion_id: ids["calm"],
                score: 0.7,
            }],
        )
        .await
        .unwrap();

    // Second link violates the emotions foreign key; the whole replace rolls back.
    let result = store
        .replace_links(
            movie_id,
            &[
                NewLink {
                    emotion_id: ids["hope"],
                    score: 0.4,
                },
                NewLink {
                    emotion_id: 9_999,
                    score: 0.4,
                },
            ],
        )
        .await;
    assert!(matches!(result, Err(TaggerError::Database(_))));

    let links = links_of(&store, 50).await;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].0, "calm");
    assert!(approx(links[0].1, 0.7));
}

#[tokio::test]
async fn tag_one_rejects_unknown_movie() {
    let store = seeded_store().await;
    let err = pipeline::tag_one(&store, &EmotionTagger::default(), 404)
        .await
        .unwrap_err();
    assert!(matches!(err, TaggerError::MovieNotFound(404)));
}

#[tokio::test]
async fn movies_for_emotion_are_ranked_by_score() {
    let store = seeded_store().await;
    store
        .upsert_movie(&movie(60, "Ghost", "Horror", "ghost, zombie", ""))
        .await
        .unwrap();
    store
        .upsert_movie(&movie(61, "Untitled", "Horror Comedy", "", ""))
        .await
        .unwrap();
    pipeline::run_batch(&store, &EmotionTagger::default(), 10)
        .await
        .unwrap();

    let movies = store.movies_for_emotion("fear").await.unwrap();
    let ids: Vec<i64> = movies.iter().map(|m| m.tmdb_id).collect();
    assert_eq!(ids, vec![60, 61]);
    assert!(movies[0].score >= movies[1].score);

    let err = store.movies_for_emotion("boredom").await.unwrap_err();
    assert!(matches!(err, TaggerError::UnknownEmotion(_)));

    let summaries = store.emotion_summaries().await.unwrap();
    let fear = summaries.iter().find(|s| s.name == "fear").unwrap();
    assert_eq!(fear.movie_count, 2);
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let store = empty_store().await;
    let seeds = catalog::default_seeds();
    assert_eq!(catalog::seed_emotions(&store, &seeds).await.unwrap(), 10);
    assert_eq!(catalog::seed_emotions(&store, &seeds).await.unwrap(), 0);
    assert_eq!(store.registered_emotions().await.unwrap().len(), 10);
}

#[tokio::test]
async fn seed_file_labels_resolve_to_taggable_emotions() {
    let store = empty_store().await;
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("emotions.toml");
    std::fs::write(
        &path,
        "[[emotions]]\nname = \"공포\"\n\n[[emotions]]\nname = \"Tension\"\n",
    )
    .unwrap();
    let seeds = catalog::load_seeds_from_file(&path).unwrap();
    assert_eq!(catalog::seed_emotions(&store, &seeds).await.unwrap(), 2);

    store
        .upsert_movie(&movie(50, "Untitled", "Horror Comedy", "", ""))
        .await
        .unwrap();
    let summary = pipeline::run_batch(&store, &EmotionTagger::default(), 1)
        .await
        .unwrap();
    assert_eq!(summary.integrity_failures, 0);

    let links = links_of(&store, 50).await;
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].0, "fear");
    assert!(approx(links[0].1, 0.5));
    assert_eq!(links[1].0, "tension");
    assert!(approx(links[1].1, 0.3));
}

#[tokio::test]
async fn import_upserts_by_tmdb_id() {
    let store = seeded_store().await;
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("movies.json");
    std::fs::write(
        &path,
        r#"[
            {"tmdb_id": 496243, "title": "기생충", "genres": ["코미디", "스릴러", "드라마"],
             "keywords": "class differences, 반전", "overview": "전원백수 가족의 이야기",
             "vote_average": 8.5, "release_date": "2019-05-30"},
            {"tmdb_id": 1, "title": "", "genres": "Drama"},
            {"tmdb_id": 2, "title": "Bad Date", "release_date": "yesterday"}
        ]"#,
    )
    .unwrap();

    let summary = catalog::import_movies(&store, &path).await.unwrap();
    assert_eq!(summary.upserted, 1);
    assert_eq!(summary.skipped, 2);

    std::fs::write(
        &path,
        r#"[{"tmdb_id": 496243, "title": "Parasite", "genres": "Comedy, Thriller"}]"#,
    )
    .unwrap();
    catalog::import_movies(&store, &path).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);

    let outcome = pipeline::tag_one(&store, &EmotionTagger::default(), 496243)
        .await
        .unwrap();
    assert_eq!(outcome.title, "Parasite");
    let names: Vec<Emotion> = outcome.links.iter().map(|l| l.emotion).collect();
    assert_eq!(names, vec![Emotion::Happiness, Emotion::Tension]);
}
