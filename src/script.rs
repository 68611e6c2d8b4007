//! Step scripts for the `run` command

use action_flow::{ActionExecutor, PerformReport, PerformRequest, RetryPolicy};
use action_locator::LocatorRegistry;
use action_primitives::ActionVerb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use webheal_core_types::{MisuseError, Selector, Target};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("step {index}: {source}")]
    Misuse {
        index: usize,
        #[source]
        source: MisuseError,
    },
    #[error("step {index}: exactly one of `target` or `selector` is required")]
    Locate { index: usize },
}

/// A YAML script: optional seed locators followed by ordered steps
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Initial target -> selector entries, applied only where the registry has none
    #[serde(default)]
    pub locators: BTreeMap<Target, Selector>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub selector: Option<String>,

    pub action: String,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl Step {
    /// Validate the step into a request; `index` is 1-based for messages
    pub fn to_request(&self, index: usize) -> Result<PerformRequest, ScriptError> {
        let verb = ActionVerb::from_parts(&self.action, self.value.clone())
            .map_err(|source| ScriptError::Misuse { index, source })?;

        let request = match (&self.target, &self.selector) {
            (Some(name), None) => {
                let target = Target::new(name.as_str())
                    .map_err(|source| ScriptError::Misuse { index, source })?;
                PerformRequest::target(target, verb)
            }
            (None, Some(selector)) => PerformRequest::selector(selector.as_str(), verb),
            _ => return Err(ScriptError::Locate { index }),
        };

        Ok(request.with_alternatives(self.alternatives.iter().map(String::as_str)))
    }
}

/// First step whose action exhausted its retry budget
#[derive(Debug, Error)]
#[error("step {index} ({action}) failed: {source}")]
pub struct StepFailure {
    pub index: usize,
    pub action: String,
    #[source]
    pub source: action_flow::ExecutionFailure,
}

impl Script {
    pub fn from_yaml(raw: &str) -> Result<Self, ScriptError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Build every request up front so a malformed step fails before anything runs
    pub fn requests(&self) -> Result<Vec<PerformRequest>, ScriptError> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| step.to_request(i + 1))
            .collect()
    }

    /// Seed the registry without overwriting existing (possibly healed) entries
    pub async fn seed(&self, registry: &LocatorRegistry) -> usize {
        let mut seeded = 0;
        for (target, selector) in &self.locators {
            if registry.get(target).is_none() {
                registry.set(target, selector.clone()).await;
                seeded += 1;
            }
        }
        seeded
    }
}

/// Run requests in order, stopping at the first failure
pub async fn execute_steps(
    executor: &dyn ActionExecutor,
    requests: &[PerformRequest],
    policy: &RetryPolicy,
) -> Result<Vec<PerformReport>, StepFailure> {
    let mut reports = Vec::with_capacity(requests.len());
    for (i, request) in requests.iter().enumerate() {
        match executor.perform(request, policy).await {
            Ok(report) => {
                info!(
                    step = i + 1,
                    attempts = report.attempts,
                    selector = %report.selector,
                    "step completed"
                );
                reports.push(report);
            }
            Err(source) => {
                error!(step = i + 1, locate = %request.locate, "step failed: {}", source);
                return Err(StepFailure {
                    index: i + 1,
                    action: request.verb.name().to_string(),
                    source,
                });
            }
        }
    }
    Ok(reports)
}
