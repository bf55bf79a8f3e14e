//! Application configuration, read from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::defaults::Defaults;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub assistant: AssistantConfig,
    pub timing: TimingConfig,
    pub rewards: RewardsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    /// Usually supplied through GEMINI_API_KEY instead of the file.
    pub api_key: Option<String>,
    pub flash_model: String,
    pub pro_model: String,
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: Defaults::ASSISTANT_BASE_URL.into(),
            api_key: None,
            flash_model: Defaults::FLASH_MODEL.into(),
            pro_model: Defaults::PRO_MODEL.into(),
            timeout_secs: Defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Artificial latencies, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub splash_ms: u64,
    pub submission_confirm_ms: u64,
    pub verified_advance_ms: u64,
    pub code_send_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            splash_ms: Defaults::SPLASH_MS,
            submission_confirm_ms: Defaults::SUBMISSION_CONFIRM_MS,
            verified_advance_ms: Defaults::VERIFIED_ADVANCE_MS,
            code_send_delay_ms: Defaults::CODE_SEND_DELAY_MS,
        }
    }
}

impl TimingConfig {
    pub fn splash(&self) -> Duration {
        Duration::from_millis(self.splash_ms)
    }
    pub fn submission_confirm(&self) -> Duration {
        Duration::from_millis(self.submission_confirm_ms)
    }
    pub fn verified_advance(&self) -> Duration {
        Duration::from_millis(self.verified_advance_ms)
    }
    pub fn code_send_delay(&self) -> Duration {
        Duration::from_millis(self.code_send_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    /// Credited when a completed quest has neither a fixed reward nor a winning bid.
    pub fallback_reward: u64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self { fallback_reward: Defaults::FALLBACK_REWARD }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    /// JSON fixtures replacing the built-in marketplace.
    pub fixtures: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(Defaults::DATA_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(".tasktribe"))
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.into(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.into(), source })
    }

    /// Missing file means defaults; a file that exists must parse.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.timing.splash_ms, 2500);
        assert_eq!(cfg.timing.submission_confirm_ms, 1500);
        assert_eq!(cfg.timing.verified_advance_ms, 2000);
        assert_eq!(cfg.rewards.fallback_reward, 50);
        assert_eq!(cfg.assistant.flash_model, "gemini-2.5-flash");
        assert_eq!(cfg.assistant.pro_model, "gemini-2.5-pro");
    }

    #[test]
    fn partial_sections_override() {
        let cfg: Config = toml::from_str(
            r#"
[timing]
splash_ms = 0

[rewards]
fallback_reward = 75

[storage]
data_dir = "/tmp/tt"
"#,
        )
        .unwrap();
        assert_eq!(cfg.timing.splash(), Duration::ZERO);
        assert_eq!(cfg.timing.code_send_delay_ms, 1000);
        assert_eq!(cfg.rewards.fallback_reward, 75);
        assert_eq!(cfg.storage.resolve_data_dir(), PathBuf::from("/tmp/tt"));
    }

    #[test]
    fn missing_file_is_default_but_bad_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_or_default(&missing).is_ok());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[timing\nsplash_ms = ").unwrap();
        assert!(matches!(Config::load_or_default(&bad), Err(ConfigError::Parse { .. })));
    }
}
