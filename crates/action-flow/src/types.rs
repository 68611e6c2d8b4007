//! Core types for retrying execution

use action_primitives::ActionVerb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use webheal_core_types::{MisuseError, Selector, Target};

/// Bounded retry budget for one `perform` call
///
/// `max_attempts == 0` is legal and means the action is never executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of execution attempts
    pub max_attempts: u32,

    /// Suspension between a failed attempt and the next one
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Build from a signed count, rejecting negative values
    pub fn try_new(max_attempts: i64, delay: Duration) -> Result<Self, MisuseError> {
        let max_attempts = u32::try_from(max_attempts)
            .map_err(|_| MisuseError::NegativeRetryCount(max_attempts))?;
        Ok(Self::new(max_attempts, delay))
    }

    /// Number of waits a fully failing run performs
    pub fn waits_on_exhaustion(&self) -> u32 {
        self.max_attempts.saturating_sub(1)
    }
}

/// Retry delay as written in configuration: seconds or a humantime string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DelaySpec {
    Seconds(f64),
    Human(String),
}

impl Default for DelaySpec {
    fn default() -> Self {
        DelaySpec::Human("1s".to_string())
    }
}

impl DelaySpec {
    pub fn to_duration(&self) -> Result<Duration, MisuseError> {
        match self {
            DelaySpec::Seconds(secs) if *secs < 0.0 => {
                Err(MisuseError::NegativeRetryDelay(secs.to_string()))
            }
            DelaySpec::Seconds(secs) => Duration::try_from_secs_f64(*secs)
                .map_err(|_| MisuseError::InvalidRetryDelay(secs.to_string())),
            DelaySpec::Human(raw) => {
                let trimmed = raw.trim();
                if trimmed.starts_with('-') {
                    return Err(MisuseError::NegativeRetryDelay(trimmed.to_string()));
                }
                if trimmed == "0" {
                    return Ok(Duration::ZERO);
                }
                humantime::parse_duration(trimmed)
                    .map_err(|_| MisuseError::InvalidRetryDelay(trimmed.to_string()))
            }
        }
    }
}

/// Retry options as supplied by configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i64,

    #[serde(default)]
    pub delay: DelaySpec,
}

fn default_max_attempts() -> i64 {
    3
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: DelaySpec::default(),
        }
    }
}

impl TryFrom<&RetryConfig> for RetryPolicy {
    type Error = MisuseError;

    fn try_from(config: &RetryConfig) -> Result<Self, Self::Error> {
        RetryPolicy::try_new(config.max_attempts, config.delay.to_duration()?)
    }
}

/// How an action finds its element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locate {
    /// Resolved through the registry on every attempt; eligible for healing
    Target(Target),

    /// Used verbatim; never healed
    Selector(Selector),
}

impl Locate {
    /// Target name or raw selector text
    pub fn name(&self) -> &str {
        match self {
            Locate::Target(target) => target.as_str(),
            Locate::Selector(selector) => selector.as_str(),
        }
    }
}

impl fmt::Display for Locate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locate::Target(target) => write!(f, "target:{}", target),
            Locate::Selector(selector) => write!(f, "selector:{}", selector),
        }
    }
}

/// One logical action plus the caller's ranked alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformRequest {
    pub locate: Locate,
    pub verb: ActionVerb,
    pub alternatives: Vec<Selector>,
}

impl PerformRequest {
    pub fn target(target: Target, verb: ActionVerb) -> Self {
        Self {
            locate: Locate::Target(target),
            verb,
            alternatives: Vec::new(),
        }
    }

    pub fn selector(selector: impl Into<Selector>, verb: ActionVerb) -> Self {
        Self {
            locate: Locate::Selector(selector.into()),
            verb,
            alternatives: Vec::new(),
        }
    }

    /// Ranked candidates, best guess first
    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selector>,
    {
        self.alternatives = alternatives.into_iter().map(Into::into).collect();
        self
    }
}

/// Outcome of a successful `perform`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformReport {
    /// Attempt number that succeeded (1-based)
    pub attempts: u32,

    /// Selector the successful attempt used
    pub selector: Selector,

    /// Selector persisted by healing during this call, if any
    pub healed: Option<Selector>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
        assert_eq!(policy.waits_on_exhaustion(), 2);
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).waits_on_exhaustion(), 0);
    }

    #[test]
    fn test_negative_count_is_misuse() {
        assert_eq!(
            RetryPolicy::try_new(-1, Duration::ZERO),
            Err(MisuseError::NegativeRetryCount(-1))
        );
        assert_eq!(RetryPolicy::try_new(0, Duration::ZERO).unwrap().max_attempts, 0);
    }

    #[test]
    fn test_delay_spec_parsing() {
        assert_eq!(
            DelaySpec::Seconds(0.5).to_duration().unwrap(),
            Duration::from_millis(500)
        );
        assert_eq!(
            DelaySpec::Human("250ms".into()).to_duration().unwrap(),
            Duration::from_millis(250)
        );
        assert_eq!(DelaySpec::Human("0".into()).to_duration().unwrap(), Duration::ZERO);
        assert!(matches!(
            DelaySpec::Seconds(-2.0).to_duration(),
            Err(MisuseError::NegativeRetryDelay(_))
        ));
        assert!(matches!(
            DelaySpec::Human("-1s".into()).to_duration(),
            Err(MisuseError::NegativeRetryDelay(_))
        ));
        assert!(matches!(
            DelaySpec::Human("soon".into()).to_duration(),
            Err(MisuseError::InvalidRetryDelay(_))
        ));
    }

    #[test]
    fn test_retry_config_from_yaml() {
        let config: RetryConfig = serde_yaml::from_str("max_attempts: 5\ndelay: 2").unwrap();
        let policy = RetryPolicy::try_from(&config).unwrap();
        assert_eq!(policy, RetryPolicy::new(5, Duration::from_secs(2)));

        let config: RetryConfig = serde_yaml::from_str("delay: 100ms").unwrap();
        let policy = RetryPolicy::try_from(&config).unwrap();
        assert_eq!(policy, RetryPolicy::new(3, Duration::from_millis(100)));

        let config: RetryConfig = serde_yaml::from_str("max_attempts: -3").unwrap();
        assert!(RetryPolicy::try_from(&config).is_err());
    }

    #[test]
    fn test_request_builders() {
        let request = PerformRequest::target(Target::new("save").unwrap(), ActionVerb::Click)
            .with_alternatives(["#save", ".save"]);
        assert_eq!(request.alternatives.len(), 2);
        assert_eq!(request.locate.to_string(), "target:save");

        let raw = PerformRequest::selector("#go", ActionVerb::Hover);
        assert_eq!(raw.locate, Locate::Selector(Selector::from("#go")));
    }
}
