use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;
use thiserror::Error;
use tracing::debug;

/// One executed interaction. Never mutated after insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAction {
    #[serde(rename = "action")]
    pub verb: String,
    pub selector: String,
    pub value: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("failed to write recording: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize recording: {0}")]
    Serialize(#[from] serde_json::Error),
}

type Log = Arc<RwLock<Vec<RecordedAction>>>;

/// Shared append-only recorder
///
/// Clones append to the same log. `record` accepts any input, including
/// empty strings, and cannot fail.
#[derive(Clone, Default)]
pub struct ActionRecorder {
    log: Log,
}

impl ActionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, verb: &str, selector: &str, value: Option<&str>) {
        let verb_owned = verb.to_string();
        let selector_owned = selector.to_string();
        let value = value.map(str::to_string);

        // Stamp under the write lock so timestamps follow insertion order
        let mut guard = self.log.write();
        guard.push(RecordedAction {
            verb: verb_owned,
            selector: selector_owned,
            value,
            timestamp: Utc::now(),
        });
        debug!(verb, selector, index = guard.len() - 1, "recorded action");
    }

    /// Live view over the full history of this run
    ///
    /// Not a snapshot: entries recorded after the call show up in the view.
    pub fn export(&self) -> RecordingView {
        RecordingView {
            log: self.log.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }

    pub fn to_json(&self) -> Result<String, RecorderError> {
        Ok(serde_json::to_string_pretty(&*self.log.read())?)
    }

    /// Write the ordered `{action, selector, value, timestamp}` array
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), RecorderError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, &*self.log.read())?;
        writer.flush()?;
        Ok(())
    }
}

/// Read-only live view returned by [`ActionRecorder::export`]
#[derive(Clone)]
pub struct RecordingView {
    log: Log,
}

impl RecordingView {
    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RecordedAction> {
        self.log.read().get(index).cloned()
    }

    pub fn last(&self) -> Option<RecordedAction> {
        self.log.read().last().cloned()
    }

    /// Copy of the entries as they stand right now
    pub fn to_vec(&self) -> Vec<RecordedAction> {
        self.log.read().clone()
    }
}
