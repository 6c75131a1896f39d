//! Observable codec events.
//!
//! Conditions that do not abort an encode or decode are reported as
//! [`CodecEvent`]s through an injectable [`EventSink`]. The default sink
//! drops them; [`TracingSink`] forwards them to `tracing`, and
//! [`RecordingSink`] keeps them for inspection.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use treepack::codec::{CodecEvent, EventSink, RecordingSink};
//!
//! let sink = Arc::new(RecordingSink::new());
//! sink.emit(&CodecEvent::UnknownTypeTag {
//!     path: "/a".to_string(),
//!     tag: "complex".to_string(),
//! });
//! assert_eq!(sink.warnings().len(), 1);
//! ```

use std::fmt::Debug;
use std::sync::Mutex;

/// Something noteworthy that happened during a codec operation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecEvent {
    /// A node carried a tag outside the known kinds and was decoded with
    /// the raw-payload fallback.
    UnknownTypeTag { path: String, tag: String },
}

impl CodecEvent {
    /// Returns true for events that signal a possible loss of fidelity.
    pub fn is_warning(&self) -> bool {
        match self {
            CodecEvent::UnknownTypeTag { .. } => true,
        }
    }
}

/// Receiver for [`CodecEvent`]s.
pub trait EventSink: Send + Sync + Debug {
    fn emit(&self, event: &CodecEvent);
}

/// Sink that discards every event. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &CodecEvent) {}
}

/// Sink that logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &CodecEvent) {
        match event {
            CodecEvent::UnknownTypeTag { path, tag } => {
                tracing::warn!(
                    path = %path,
                    tag = %tag,
                    "Unknown type tag, decoding raw payload"
                );
            }
        }
    }
}

/// Sink that records every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CodecEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded events.
    pub fn events(&self) -> Vec<CodecEvent> {
        self.lock().clone()
    }

    /// Returns the recorded events that are warnings.
    pub fn warnings(&self) -> Vec<CodecEvent> {
        self.lock()
            .iter()
            .filter(|event| event.is_warning())
            .cloned()
            .collect()
    }

    /// Removes and returns all recorded events.
    pub fn take(&self) -> Vec<CodecEvent> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CodecEvent>> {
        // A panic while pushing cannot leave the Vec half-written.
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &CodecEvent) {
        self.lock().push(event.clone());
    }
}
