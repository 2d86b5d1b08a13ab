use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tagging: TaggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/clou.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    /// Emotions scoring below this are dropped.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Upper bound on links written per movie.
    #[serde(default = "default_max_emotions")]
    pub max_emotions: usize,
    /// Emit a progress line every N movies during a batch (0 disables).
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_min_score() -> f64 {
    0.2
}

fn default_max_emotions() -> usize {
    5
}

fn default_progress_every() -> usize {
    10
}

/// Lowest score a persisted link may carry.
pub const MIN_SCORE_FLOOR: f64 = 0.2;
/// Most links a movie may carry.
pub const MAX_EMOTIONS_CAP: usize = 5;

impl TaggingConfig {
    /// Rejects limits that would persist links under 0.2 or more than five per movie.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(MIN_SCORE_FLOOR..=1.0).contains(&self.min_score) {
            anyhow::bail!(
                "tagging.min_score must be within [{MIN_SCORE_FLOOR}, 1.0], got {}",
                self.min_score
            );
        }
        if !(1..=MAX_EMOTIONS_CAP).contains(&self.max_emotions) {
            anyhow::bail!(
                "tagging.max_emotions must be within 1..={MAX_EMOTIONS_CAP}, got {}",
                self.max_emotions
            );
        }
        Ok(())
    }
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            max_emotions: default_max_emotions(),
            progress_every: default_progress_every(),
        }
    }
}

/// Loads `path` (or `config/default` when present), then `CLOU__SECTION__KEY`
/// environment overrides.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("CLOU")
            .separator("__")
            .try_parsing(true),
    );
    let cfg: AppConfig = settings.build()?.try_deserialize()?;
    cfg.tagging.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("clou.toml");
        std::fs::write(&path, "[tagging]\nmax_emotions = 3\n").unwrap();

        let cfg = load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(cfg.tagging.max_emotions, 3);
        assert_eq!(cfg.tagging.min_score, 0.2);
        assert_eq!(cfg.tagging.progress_every, 10);
        assert_eq!(cfg.database.path, "data/clou.db");
    }

    #[test]
    fn out_of_range_tagging_limits_are_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("clou.toml");

        std::fs::write(&path, "[tagging]\nmax_emotions = 9\nmin_score = 0.0\n").unwrap();
        assert!(load(Some(&path.to_string_lossy())).is_err());

        std::fs::write(&path, "[tagging]\nmax_emotions = 0\n").unwrap();
        assert!(load(Some(&path.to_string_lossy())).is_err());

        std::fs::write(&path, "[tagging]\nmin_score = 0.1\n").unwrap();
        assert!(load(Some(&path.to_string_lossy())).is_err());

        std::fs::write(&path, "[tagging]\nmax_emotions = 5\nmin_score = 0.4\n").unwrap();
        let cfg = load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(cfg.tagging.max_emotions, 5);
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.toml");
        assert!(load(Some(&path.to_string_lossy())).is_err());
    }
}
