//! Healing strategies: probe ranked alternatives, first success wins

use crate::types::HealingAttempt;
use action_primitives::PageCapability;
use async_trait::async_trait;
use tracing::{debug, info, warn};
use webheal_core_types::Selector;

/// Healing strategy trait
#[async_trait]
pub trait HealingStrategy: Send + Sync {
    /// Probe candidates and report what was tried and what resolved
    async fn probe_candidates(
        &self,
        probe: &dyn PageCapability,
        candidates: &[Selector],
    ) -> HealingAttempt;

    /// Return the candidate chosen by this strategy, if any
    async fn try_alternatives(
        &self,
        probe: &dyn PageCapability,
        candidates: &[Selector],
    ) -> Option<Selector> {
        self.probe_candidates(probe, candidates).await.healed
    }

    fn name(&self) -> &'static str;
}

/// Default strategy: walk candidates in caller order, stop at the first live one
///
/// The order encodes caller-assigned priority. Each candidate is probed at
/// most once per pass and a probe error counts as "does not exist".
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatchStrategy;

impl FirstMatchStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HealingStrategy for FirstMatchStrategy {
    async fn probe_candidates(
        &self,
        probe: &dyn PageCapability,
        candidates: &[Selector],
    ) -> HealingAttempt {
        let mut attempt = HealingAttempt::default();

        for candidate in candidates {
            attempt.tried.push(candidate.clone());
            match probe.exists(candidate).await {
                Ok(true) => {
                    info!(
                        selector = %candidate,
                        probes = attempt.tried.len(),
                        "healing candidate resolved"
                    );
                    attempt.healed = Some(candidate.clone());
                    return attempt;
                }
                Ok(false) => {
                    debug!(selector = %candidate, "candidate does not resolve");
                }
                Err(err) => {
                    debug!(selector = %candidate, %err, "probe failed; trying next candidate");
                }
            }
        }

        if !candidates.is_empty() {
            warn!("All {} healing candidates exhausted", candidates.len());
        }
        attempt
    }

    fn name(&self) -> &'static str {
        "first-match"
    }
}
