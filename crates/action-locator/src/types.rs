//! Core types for the healing pass

use webheal_core_types::Selector;

/// Trace of one healing pass
///
/// Ephemeral: it lives for one retry cycle and is only logged, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealingAttempt {
    /// Candidates probed, in probe order
    pub tried: Vec<Selector>,

    /// The candidate that resolved, if any
    pub healed: Option<Selector>,
}

impl HealingAttempt {
    pub fn is_success(&self) -> bool {
        self.healed.is_some()
    }

    /// Number of probe calls made during the pass
    pub fn probes(&self) -> usize {
        self.tried.len()
    }
}
