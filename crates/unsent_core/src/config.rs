//! Core configuration, loadable from TOML.
//!
//! # Responsibility
//! - Hold storage, logging, feed, card timing and display settings.
//! - Reject values the card engine or the feed cannot honor.
//!
//! # Invariants
//! - Every field has a default; an empty document is a valid config.
//! - `validate()` must pass before a config is handed to the engine.

use crate::logging::normalize_level;
use crate::service::memory_service::DEFAULT_RECENT_LIMIT;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const MAX_UTC_OFFSET_MINUTES: u32 = 14 * 60;

/// Configuration load/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Invalid { field, message } => write!(f, "invalid config `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub card: CardConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl CoreConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.logging.level {
            normalize_level(level).map_err(|message| ConfigError::Invalid {
                field: "logging.level",
                message,
            })?;
        }
        if self.feed.recent_limit == 0 {
            return Err(invalid("feed.recent_limit", "must be at least 1"));
        }
        self.card.validate()?;
        if self.display.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(invalid(
                "display.utc_offset_minutes",
                format!("must be within +/-{MAX_UTC_OFFSET_MINUTES}"),
            ));
        }
        Ok(())
    }
}

/// Storage location; `None` selects an in-memory database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Logging settings; absent values use `default_log_level()` and no file log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Size of the "recent memories" feed.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

/// Card engine timing and prompt list. All durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Quiet period before a one-shot effect arms.
    #[serde(default = "default_arm_delay")]
    pub effect_arm_delay_ms: u64,
    #[serde(default = "default_pulse_period")]
    pub pulse_period_ms: u64,
    /// Must be shorter than `pulse_period_ms`.
    #[serde(default = "default_pulse_active")]
    pub pulse_active_ms: u64,
    #[serde(default = "default_type_interval")]
    pub type_interval_ms: u64,
    #[serde(default = "default_delete_interval")]
    pub delete_interval_ms: u64,
    #[serde(default = "default_prompt_pause")]
    pub prompt_pause_ms: u64,
    #[serde(default = "default_prompts")]
    pub prompts: Vec<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            effect_arm_delay_ms: default_arm_delay(),
            pulse_period_ms: default_pulse_period(),
            pulse_active_ms: default_pulse_active(),
            type_interval_ms: default_type_interval(),
            delete_interval_ms: default_delete_interval(),
            prompt_pause_ms: default_prompt_pause(),
            prompts: default_prompts(),
        }
    }
}

impl CardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("card.effect_arm_delay_ms", self.effect_arm_delay_ms),
            ("card.pulse_period_ms", self.pulse_period_ms),
            ("card.pulse_active_ms", self.pulse_active_ms),
            ("card.type_interval_ms", self.type_interval_ms),
            ("card.delete_interval_ms", self.delete_interval_ms),
            ("card.prompt_pause_ms", self.prompt_pause_ms),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }
        if self.pulse_active_ms >= self.pulse_period_ms {
            return Err(invalid(
                "card.pulse_active_ms",
                "must be shorter than card.pulse_period_ms",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Offset applied when deriving date/day/time from `created_at`.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

fn default_recent_limit() -> u32 {
    DEFAULT_RECENT_LIMIT
}

fn default_arm_delay() -> u64 {
    5_000
}

fn default_pulse_period() -> u64 {
    5_000
}

fn default_pulse_active() -> u64 {
    1_000
}

fn default_type_interval() -> u64 {
    100
}

fn default_delete_interval() -> u64 {
    50
}

fn default_prompt_pause() -> u64 {
    2_000
}

fn default_prompts() -> Vec<String> {
    [
        "Tap to reveal message",
        "Some words were never sent",
        "Someone kept this for you",
        "Read it slowly",
        "This was meant for you",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.feed.recent_limit, 3);
        assert_eq!(config.card.effect_arm_delay_ms, 5_000);
        assert_eq!(config.card.pulse_active_ms, 1_000);
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = CoreConfig::from_toml_str(
            r#"
            [card]
            effect_arm_delay_ms = 250
            prompts = ["hello"]

            [display]
            utc_offset_minutes = -300
            "#,
        )
        .unwrap();
        assert_eq!(config.card.effect_arm_delay_ms, 250);
        assert_eq!(config.card.pulse_period_ms, 5_000);
        assert_eq!(config.card.prompts, vec!["hello".to_string()]);
        assert_eq!(config.display.utc_offset_minutes, -300);
    }

    #[test]
    fn rejects_pulse_longer_than_period() {
        let err = CoreConfig::from_toml_str(
            "[card]\npulse_period_ms = 1000\npulse_active_ms = 1000\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "card.pulse_active_ms",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_recent_limit_and_bad_level() {
        let err = CoreConfig::from_toml_str("[feed]\nrecent_limit = 0\n").unwrap_err();
        assert!(err.to_string().contains("feed.recent_limit"));

        let err = CoreConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn rejects_out_of_range_offsets_including_extremes() {
        for offset in [i32::MIN, i32::MAX, 841, -841] {
            let err = CoreConfig::from_toml_str(&format!(
                "[display]\nutc_offset_minutes = {offset}\n"
            ))
            .unwrap_err();
            assert!(
                err.to_string().contains("display.utc_offset_minutes"),
                "offset {offset}"
            );
        }
        assert!(CoreConfig::from_toml_str("[display]\nutc_offset_minutes = -840\n").is_ok());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = CoreConfig::from_toml_str("[feed\nrecent_limit = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[feed]\nrecent_limit = 7").unwrap();

        let config = CoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.feed.recent_limit, 7);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CoreConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
