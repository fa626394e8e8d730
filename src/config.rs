// Configuration loading and parsing (config/dashboard.toml).

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Datelike;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataPaths,
    #[serde(default)]
    pub seasons: SeasonRange,
    #[serde(default)]
    pub projections: ProjectionsConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub scoring: ScoringWeights,
}

impl Config {
    pub fn season_range(&self) -> RangeInclusive<u16> {
        self.seasons.first..=self.seasons.last
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.images.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub roster_csv: String,
    pub stats_csv: String,
}

/// Historical seasons to load stats for, both ends inclusive. `last`
/// defaults to the most recent completed season.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonRange {
    #[serde(default = "default_first_season")]
    pub first: u16,
    #[serde(default = "default_last_season")]
    pub last: u16,
}

impl Default for SeasonRange {
    fn default() -> Self {
        SeasonRange {
            first: default_first_season(),
            last: default_last_season(),
        }
    }
}

fn default_first_season() -> u16 {
    2018
}

fn default_last_season() -> u16 {
    (chrono::Utc::now().year() - 1) as u16
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionsConfig {
    #[serde(default = "default_projections_base_url")]
    pub base_url: String,
    #[serde(default = "default_projections_week")]
    pub week: String,
    /// When set, position pages are read as `<slug>.html` files from this
    /// directory instead of being fetched from the site.
    #[serde(default)]
    pub pages_dir: Option<String>,
}

impl Default for ProjectionsConfig {
    fn default() -> Self {
        ProjectionsConfig {
            base_url: default_projections_base_url(),
            week: default_projections_week(),
            pages_dir: None,
        }
    }
}

fn default_projections_base_url() -> String {
    "https://www.fantasypros.com/nfl/projections".to_string()
}

fn default_projections_week() -> String {
    "draft".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// Bound on every outbound HTTP request, seconds.
    #[serde(default = "default_image_timeout_secs")]
    pub timeout_secs: u64,
    /// Scrape the player's profile page for an image URL when the roster
    /// row has none.
    #[serde(default = "default_page_lookup_fallback")]
    pub page_lookup_fallback: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        ImagesConfig {
            timeout_secs: default_image_timeout_secs(),
            page_lookup_fallback: default_page_lookup_fallback(),
        }
    }
}

fn default_image_timeout_secs() -> u64 {
    15
}

fn default_page_lookup_fallback() -> bool {
    true
}

/// Initial values for the scoring-weight inputs. Free-form by design; the
/// UI accepts whatever the user types and nothing downstream consumes them.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_ppr")]
    pub ppr: f64,
    #[serde(default = "default_pass_td")]
    pub pass_td: f64,
    #[serde(default = "default_rush_td")]
    pub rush_td: f64,
    #[serde(default = "default_rec_td")]
    pub rec_td: f64,
    #[serde(default = "default_turnover")]
    pub turnover: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            ppr: default_ppr(),
            pass_td: default_pass_td(),
            rush_td: default_rush_td(),
            rec_td: default_rec_td(),
            turnover: default_turnover(),
        }
    }
}

fn default_ppr() -> f64 {
    1.0
}

fn default_pass_td() -> f64 {
    4.0
}

fn default_rush_td() -> f64 {
    6.0
}

fn default_rec_td() -> f64 {
    6.0
}

fn default_turnover() -> f64 {
    -2.0
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/dashboard.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization
/// automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("dashboard.toml");
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, keep the user's copy
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to `HUDDLE_CONFIG_DIR` when
/// set, otherwise the current working directory. Ensures default config
/// files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = match std::env::var("HUDDLE_CONFIG_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
            path: PathBuf::from("."),
        })?,
    };
    ensure_config_files(&base_dir)?;
    load_config_from(&base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.roster_csv.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.roster_csv".into(),
            message: "must not be empty".into(),
        });
    }

    if config.data.stats_csv.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.stats_csv".into(),
            message: "must not be empty".into(),
        });
    }

    // Seasonal data starts in 1999.
    if config.seasons.first < 1999 {
        return Err(ConfigError::ValidationError {
            field: "seasons.first".into(),
            message: format!("must be 1999 or later, got {}", config.seasons.first),
        });
    }

    if config.seasons.first > config.seasons.last {
        return Err(ConfigError::ValidationError {
            field: "seasons.first".into(),
            message: format!(
                "must not exceed seasons.last ({}), got {}",
                config.seasons.last, config.seasons.first
            ),
        });
    }

    if config.projections.week.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "projections.week".into(),
            message: "must not be empty".into(),
        });
    }

    // base_url is only consulted when pages are not read from disk.
    if config.projections.pages_dir.is_none() && config.projections.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "projections.base_url".into(),
            message: "must not be empty when pages_dir is unset".into(),
        });
    }

    if config.images.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "images.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
