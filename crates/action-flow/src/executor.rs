//! Retrying executor implementation

use crate::errors::{AttemptFailure, ExecutionFailure};
use crate::types::{Locate, PerformReport, PerformRequest, RetryPolicy};
use action_locator::LocatorRegistry;
use action_primitives::{dispatch, PageCapability};
use action_recorder::ActionRecorder;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use webheal_core_types::{ActionId, Selector};

/// Action executor trait
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Perform one logical action under a retry policy
    async fn perform(
        &self,
        request: &PerformRequest,
        policy: &RetryPolicy,
    ) -> Result<PerformReport, ExecutionFailure>;
}

/// Default executor: resolve, execute, heal between attempts, record everything
///
/// One executor drives one page. Waiting suspends only the calling task.
pub struct RetryingExecutor {
    page: Arc<dyn PageCapability>,
    registry: LocatorRegistry,
    recorder: ActionRecorder,
    healing_enabled: bool,
}

impl RetryingExecutor {
    /// Create a new executor with healing enabled
    pub fn new(
        page: Arc<dyn PageCapability>,
        registry: LocatorRegistry,
        recorder: ActionRecorder,
    ) -> Self {
        Self {
            page,
            registry,
            recorder,
            healing_enabled: true,
        }
    }

    /// Turn healing off to get plain retry behaviour
    pub fn with_healing(mut self, enabled: bool) -> Self {
        self.healing_enabled = enabled;
        self
    }

    pub fn registry(&self) -> &LocatorRegistry {
        &self.registry
    }

    pub fn recorder(&self) -> &ActionRecorder {
        &self.recorder
    }

    fn resolve(&self, locate: &Locate) -> Result<Selector, AttemptFailure> {
        match locate {
            Locate::Target(target) => {
                self.registry
                    .get(target)
                    .ok_or_else(|| AttemptFailure::Unresolved {
                        target: target.clone(),
                    })
            }
            Locate::Selector(selector) => Ok(selector.clone()),
        }
    }

    /// Run one attempt and report it to the recorder exactly once
    async fn attempt_once(&self, request: &PerformRequest) -> Result<Selector, AttemptFailure> {
        let (recorded_as, outcome) = match self.resolve(&request.locate) {
            Ok(selector) => {
                let result = dispatch(self.page.as_ref(), &request.verb, &selector).await;
                (
                    selector.to_string(),
                    result.map(|_| selector).map_err(AttemptFailure::from),
                )
            }
            Err(failure) => (request.locate.name().to_string(), Err(failure)),
        };

        let value = request.verb.value();
        self.recorder
            .record(request.verb.name(), &recorded_as, value.as_deref());
        outcome
    }

    /// Heal between attempts, only for targets with caller-supplied alternatives
    async fn heal_before_next(&self, request: &PerformRequest) -> Option<Selector> {
        if !self.healing_enabled || request.alternatives.is_empty() {
            return None;
        }
        let Locate::Target(target) = &request.locate else {
            return None;
        };
        self.registry
            .heal(target, &request.alternatives, self.page.as_ref())
            .await
    }
}

#[async_trait]
impl ActionExecutor for RetryingExecutor {
    async fn perform(
        &self,
        request: &PerformRequest,
        policy: &RetryPolicy,
    ) -> Result<PerformReport, ExecutionFailure> {
        let action_id = ActionId::new();
        info!(
            action_id = %action_id,
            locate = %request.locate,
            verb = %request.verb,
            max_attempts = policy.max_attempts,
            "performing action"
        );

        let mut healed = None;

        for attempt in 1..=policy.max_attempts {
            match self.attempt_once(request).await {
                Ok(selector) => {
                    info!(
                        action_id = %action_id,
                        attempt,
                        selector = %selector,
                        "action succeeded"
                    );
                    return Ok(PerformReport {
                        attempts: attempt,
                        selector,
                        healed,
                    });
                }
                Err(failure) => {
                    warn!(
                        action_id = %action_id,
                        attempt,
                        max_attempts = policy.max_attempts,
                        transient = failure.is_transient(),
                        "attempt failed: {}",
                        failure
                    );
                }
            }

            if attempt == policy.max_attempts {
                break;
            }

            debug!(
                action_id = %action_id,
                delay_ms = policy.delay.as_millis() as u64,
                "waiting before retry"
            );
            sleep(policy.delay).await;

            if let Some(selector) = self.heal_before_next(request).await {
                healed = Some(selector);
            }
        }

        warn!(
            action_id = %action_id,
            attempts = policy.max_attempts,
            waits = policy.waits_on_exhaustion(),
            "retry budget exhausted"
        );
        Err(ExecutionFailure {
            attempts: policy.max_attempts,
        })
    }
}
