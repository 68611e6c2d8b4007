//! Durable backing for the locator registry

use crate::errors::LocatorError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use webheal_core_types::{Selector, Target};

/// Snapshot persisted between runs
pub type LocatorMap = BTreeMap<Target, Selector>;

/// Where registry snapshots are loaded from and flushed to
pub trait RegistryStore: Send + Sync {
    fn load(&self) -> Result<LocatorMap, LocatorError>;

    fn save(&self, entries: &LocatorMap) -> Result<(), LocatorError>;
}

/// Memory-only store, mostly useful in tests
#[derive(Default)]
pub struct MemoryRegistryStore {
    data: Mutex<LocatorMap>,
}

impl MemoryRegistryStore {
    pub fn new(initial: LocatorMap) -> Self {
        Self {
            data: Mutex::new(initial),
        }
    }

    pub fn snapshot(&self) -> LocatorMap {
        self.data.lock().clone()
    }
}

impl RegistryStore for MemoryRegistryStore {
    fn load(&self) -> Result<LocatorMap, LocatorError> {
        Ok(self.data.lock().clone())
    }

    fn save(&self, entries: &LocatorMap) -> Result<(), LocatorError> {
        *self.data.lock() = entries.clone();
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    locators: LocatorMap,
}

fn default_version() -> u32 {
    1
}

/// YAML file store; a missing file loads as an empty registry
#[derive(Debug, Clone)]
pub struct FileRegistryStore {
    path: PathBuf,
}

impl FileRegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for FileRegistryStore {
    fn load(&self) -> Result<LocatorMap, LocatorError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "registry file missing; starting empty");
            return Ok(LocatorMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(LocatorMap::new());
        }
        let parsed: RegistryFile = serde_yaml::from_str(&raw)?;
        Ok(parsed.locators)
    }

    fn save(&self, entries: &LocatorMap) -> Result<(), LocatorError> {
        let snapshot = RegistryFile {
            version: default_version(),
            locators: entries.clone(),
        };
        let yaml = serde_yaml::to_string(&snapshot)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, yaml)?;
        Ok(())
    }
}
