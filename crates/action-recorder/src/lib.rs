//! Action Recorder
//!
//! Append-only, ordering-preserving log of every attempted interaction. The
//! only consumer is an external test-case generator reading `export()` or the
//! JSON written by `write_json`.

mod recorder;

pub use recorder::{ActionRecorder, RecordedAction, RecorderError, RecordingView};
