//! In-process page simulator
//!
//! Models a volatile DOM as a set of live selectors. Tests and the CLI use it
//! to drive the engine without a browser: selectors can drift (be removed or
//! added), probes can be made to error, and executes can fail transiently.

use crate::{errors::ActionError, page::PageCapability};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use webheal_core_types::Selector;

/// YAML description of a simulated page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFixture {
    /// Selectors that currently resolve
    #[serde(default)]
    pub live: Vec<String>,

    /// Selector -> number of executes that fail before one succeeds
    #[serde(default)]
    pub flaky: BTreeMap<String, u32>,

    /// Selectors whose existence probe raises instead of answering
    #[serde(default)]
    pub broken_probes: Vec<String>,
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read page fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse page fixture: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Default)]
struct PageState {
    live: HashSet<String>,
    flaky: HashMap<String, u32>,
    broken_probes: HashSet<String>,
    probed: Vec<Selector>,
    executed: Vec<(String, Selector)>,
    execute_calls: usize,
}

/// Simulated page capability
#[derive(Default)]
pub struct SimulatedPage {
    state: Mutex<PageState>,
}

impl SimulatedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_live<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let page = Self::new();
        for selector in selectors {
            page.add_live(selector);
        }
        page
    }

    pub fn from_fixture(fixture: PageFixture) -> Self {
        let page = Self::with_live(fixture.live);
        for (selector, failures) in fixture.flaky {
            page.set_flaky(selector, failures);
        }
        for selector in fixture.broken_probes {
            page.break_probe(selector);
        }
        page
    }

    pub fn load_fixture(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        let fixture: PageFixture = serde_yaml::from_str(&raw)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn add_live(&self, selector: impl Into<String>) {
        self.state.lock().live.insert(selector.into());
    }

    /// Simulate markup drift: the selector stops resolving
    pub fn remove_live(&self, selector: &str) {
        self.state.lock().live.remove(selector);
    }

    /// Make the next `failures` executes against `selector` fail
    pub fn set_flaky(&self, selector: impl Into<String>, failures: u32) {
        self.state.lock().flaky.insert(selector.into(), failures);
    }

    pub fn break_probe(&self, selector: impl Into<String>) {
        self.state.lock().broken_probes.insert(selector.into());
    }

    pub fn probe_calls(&self) -> usize {
        self.state.lock().probed.len()
    }

    /// Selectors probed so far, in call order
    pub fn probed(&self) -> Vec<Selector> {
        self.state.lock().probed.clone()
    }

    pub fn execute_calls(&self) -> usize {
        self.state.lock().execute_calls
    }

    /// Successful interactions as `(verb, selector)`, in call order
    pub fn executed(&self) -> Vec<(String, Selector)> {
        self.state.lock().executed.clone()
    }

    fn interact(&self, verb: &str, selector: &Selector) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        state.execute_calls += 1;

        if !state.live.contains(selector.as_str()) {
            debug!(verb, selector = %selector, "simulated element missing");
            return Err(ActionError::ElementNotFound(selector.to_string()));
        }

        if let Some(remaining) = state.flaky.get_mut(selector.as_str()) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ActionError::NotInteractable(format!(
                    "{} is still settling",
                    selector
                )));
            }
        }

        state.executed.push((verb.to_string(), selector.clone()));
        Ok(())
    }
}

#[async_trait]
impl PageCapability for SimulatedPage {
    async fn exists(&self, selector: &Selector) -> Result<bool, ActionError> {
        let mut state = self.state.lock();
        state.probed.push(selector.clone());
        if state.broken_probes.contains(selector.as_str()) {
            return Err(ActionError::Driver(format!(
                "probe for '{}' crashed",
                selector
            )));
        }
        Ok(state.live.contains(selector.as_str()))
    }

    async fn click(&self, selector: &Selector) -> Result<(), ActionError> {
        self.interact("click", selector)
    }

    async fn fill(&self, selector: &Selector, _text: &str) -> Result<(), ActionError> {
        self.interact("type", selector)
    }

    async fn select_option(&self, selector: &Selector, _value: &str) -> Result<(), ActionError> {
        self.interact("select", selector)
    }

    async fn hover(&self, selector: &Selector) -> Result<(), ActionError> {
        self.interact("hover", selector)
    }

    async fn execute(
        &self,
        verb: &str,
        selector: &Selector,
        _args: &[String],
    ) -> Result<(), ActionError> {
        self.interact(verb, selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dispatch, ActionVerb};
    use std::io::Write;

    #[tokio::test]
    async fn test_probe_reports_liveness() {
        let page = SimulatedPage::with_live(["#a"]);
        assert!(page.exists(&Selector::from("#a")).await.unwrap());
        assert!(!page.exists(&Selector::from("#b")).await.unwrap());
        assert_eq!(page.probe_calls(), 2);
    }

    #[tokio::test]
    async fn test_broken_probe_errors() {
        let page = SimulatedPage::with_live(["#a"]);
        page.break_probe("#a");
        assert!(page.exists(&Selector::from("#a")).await.is_err());
    }

    #[tokio::test]
    async fn test_flaky_then_success() {
        let page = SimulatedPage::with_live(["#save"]);
        page.set_flaky("#save", 2);
        let sel = Selector::from("#save");

        assert!(page.click(&sel).await.is_err());
        assert!(page.click(&sel).await.is_err());
        assert!(page.click(&sel).await.is_ok());
        assert_eq!(page.execute_calls(), 3);
        assert_eq!(page.executed(), vec![("click".to_string(), sel)]);
    }

    #[tokio::test]
    async fn test_drift() {
        let page = SimulatedPage::with_live(["#old"]);
        page.remove_live("#old");
        let err = dispatch(&page, &ActionVerb::Click, &Selector::from("#old"))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::ElementNotFound(_)));
    }

    #[test]
    fn test_load_fixture() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "live: ['#login', '#user']\nflaky:\n  '#login': 1\nbroken_probes: ['#ghost']"
        )
        .unwrap();

        let page = SimulatedPage::load_fixture(file.path()).unwrap();
        let state = page.state.lock();
        assert!(state.live.contains("#user"));
        assert_eq!(state.flaky.get("#login"), Some(&1));
        assert!(state.broken_probes.contains("#ghost"));
    }
}
