//! Configuration management module
//!
//! YAML configuration for retry and healing behaviour, with environment
//! overrides applied on top of whatever file was loaded.

use action_flow::{DelaySpec, RetryConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use webheal_core_types::MisuseError;

pub const ENV_RETRY_COUNT: &str = "WEBHEAL_RETRY_COUNT";
pub const ENV_RETRY_DELAY: &str = "WEBHEAL_RETRY_DELAY";
pub const ENV_AUTO_HEALING: &str = "WEBHEAL_AUTO_HEALING";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },
    #[error(transparent)]
    Misuse(#[from] MisuseError),
}

/// Healing switches
///
/// Healing only runs when both are on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealingConfig {
    pub auto_healing_enabled: bool,
    pub self_healing_enabled: bool,
}

impl Default for HealingConfig {
    fn default() -> Self {
        Self {
            auto_healing_enabled: true,
            self_healing_enabled: true,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub retry: RetryConfig,
    pub healing: HealingConfig,

    /// YAML file backing the locator registry
    pub registry_path: Option<PathBuf>,

    /// Where `run` writes the recorded actions
    pub recording_path: Option<PathBuf>,

    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            healing: HealingConfig::default(),
            registry_path: None,
            recording_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Apply `WEBHEAL_*` environment overrides in place
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(raw) = env::var(ENV_RETRY_COUNT) {
            let count = raw.trim().parse::<i64>().map_err(|_| ConfigError::InvalidEnv {
                key: ENV_RETRY_COUNT,
                value: raw.clone(),
            })?;
            debug!(count, "retry count overridden from environment");
            self.retry.max_attempts = count;
        }

        if let Ok(raw) = env::var(ENV_RETRY_DELAY) {
            debug!(delay = %raw, "retry delay overridden from environment");
            self.retry.delay = match raw.trim().parse::<f64>() {
                Ok(secs) => DelaySpec::Seconds(secs),
                Err(_) => DelaySpec::Human(raw),
            };
        }

        if let Ok(raw) = env::var(ENV_AUTO_HEALING) {
            let enabled = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidEnv {
                key: ENV_AUTO_HEALING,
                value: raw.clone(),
            })?;
            debug!(enabled, "auto healing overridden from environment");
            self.healing.auto_healing_enabled = enabled;
        }

        Ok(())
    }

    /// Validated retry policy; negative counts or delays are caller misuse
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        Ok(RetryPolicy::try_from(&self.retry)?)
    }

    pub fn healing_active(&self) -> bool {
        self.healing.auto_healing_enabled && self.healing.self_healing_enabled
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;

    fn clear_env() {
        env::remove_var(ENV_RETRY_COUNT);
        env::remove_var(ENV_RETRY_DELAY);
        env::remove_var(ENV_AUTO_HEALING);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(
            config.retry_policy().unwrap(),
            RetryPolicy::new(3, Duration::from_secs(1))
        );
        assert!(config.healing_active());
        assert_eq!(config.log_level, "info");
        assert_eq!(Config::from_yaml("").unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            r#"
retry:
  delay: 250ms
healing:
  self_healing_enabled: false
registry_path: locators.yaml
"#,
        )
        .unwrap();

        assert_eq!(
            config.retry_policy().unwrap(),
            RetryPolicy::new(3, Duration::from_millis(250))
        );
        assert!(config.healing.auto_healing_enabled);
        assert!(!config.healing_active());
        assert_eq!(config.registry_path, Some(PathBuf::from("locators.yaml")));
    }

    #[test]
    fn test_negative_count_surfaces_as_misuse() {
        let config = Config::from_yaml("retry:\n  max_attempts: -1\n").unwrap();
        assert!(matches!(
            config.retry_policy(),
            Err(ConfigError::Misuse(MisuseError::NegativeRetryCount(-1)))
        ));

        let config = Config::from_yaml("retry:\n  delay: soon\n").unwrap();
        assert!(matches!(
            config.retry_policy(),
            Err(ConfigError::Misuse(MisuseError::InvalidRetryDelay(_)))
        ));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var(ENV_RETRY_COUNT, "5");
        env::set_var(ENV_RETRY_DELAY, "0.5");
        env::set_var(ENV_AUTO_HEALING, "false");

        let mut config = Config::default();
        config.apply_env_overrides().unwrap();
        clear_env();

        assert_eq!(
            config.retry_policy().unwrap(),
            RetryPolicy::new(5, Duration::from_millis(500))
        );
        assert!(!config.healing_active());
    }

    #[test]
    #[serial]
    fn test_env_delay_accepts_humantime() {
        clear_env();
        env::set_var(ENV_RETRY_DELAY, "2s");

        let mut config = Config::default();
        config.apply_env_overrides().unwrap();
        clear_env();

        assert_eq!(config.retry_policy().unwrap().delay, Duration::from_secs(2));
    }

    #[test]
    #[serial]
    fn test_invalid_env_is_rejected() {
        clear_env();
        env::set_var(ENV_RETRY_COUNT, "many");

        let mut config = Config::default();
        let err = config.apply_env_overrides().unwrap_err();
        clear_env();

        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                key: ENV_RETRY_COUNT,
                ..
            }
        ));
    }

    #[test]
    #[serial]
    fn test_negative_env_count_fails_at_policy() {
        clear_env();
        env::set_var(ENV_RETRY_COUNT, "-2");

        let mut config = Config::default();
        config.apply_env_overrides().unwrap();
        clear_env();

        assert!(matches!(
            config.retry_policy(),
            Err(ConfigError::Misuse(MisuseError::NegativeRetryCount(-2)))
        ));
    }
}
