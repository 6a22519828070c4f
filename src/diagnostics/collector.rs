// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector and the handle used to feed it.
//!
//! Sessions hold a cloneable [`DiagnosticsHandle`]; sends never block and
//! are dropped when the channel is full. The owning side drains the channel
//! with [`DiagnosticsCollector::process_pending`], keeping only the newest
//! events, and exports them as JSON.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::Serialize;

use super::{
    AppOperation, BufferCapacity, DiagnosticEvent, DiagnosticEventKind, ErrorEvent, UserAction,
};
use crate::error::Result;

/// Events buffered between a handle and the collector.
const CHANNEL_CAPACITY: usize = 100;

/// Cheap, cloneable sender for diagnostic events.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    pub fn log_action(&self, action: UserAction) {
        self.log_action_with_details(action, None);
    }

    pub fn log_action_with_details(&self, action: UserAction, details: Option<String>) {
        self.send(DiagnosticEventKind::UserAction { action, details });
    }

    pub fn log_operation(&self, operation: AppOperation) {
        self.send(DiagnosticEventKind::Operation { operation });
    }

    pub fn log_warning(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Warning {
            message: message.into(),
        });
    }

    pub fn log_error(&self, event: ErrorEvent) {
        self.send(DiagnosticEventKind::Error { event });
    }

    fn send(&self, kind: DiagnosticEventKind) {
        // Non-blocking; dropped when full.
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }
}

/// Receives events from handles and keeps the most recent ones.
///
/// # Example
///
/// ```
/// use retouch_lens::diagnostics::{DiagnosticsCollector, UserAction};
///
/// let mut collector = DiagnosticsCollector::default();
/// collector.handle().log_action(UserAction::Undo);
/// assert!(collector.is_empty());
///
/// collector.process_pending();
/// assert_eq!(collector.len(), 1);
/// ```
pub struct DiagnosticsCollector {
    /// Oldest first, never longer than `capacity`.
    events: VecDeque<DiagnosticEvent>,
    capacity: BufferCapacity,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    started_at: DateTime<Utc>,
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(CHANNEL_CAPACITY);
        Self {
            events: VecDeque::with_capacity(capacity.value()),
            capacity,
            event_rx,
            event_tx,
            started_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Moves every queued event into the log, evicting the oldest entries
    /// once it is full.
    pub fn process_pending(&mut self) {
        let capacity = self.capacity.value();
        for event in self.event_rx.try_iter() {
            if self.events.len() >= capacity {
                self.events.pop_front();
            }
            self.events.push_back(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.value()
    }

    /// Serializes the buffered events as a pretty-printed JSON report.
    ///
    /// Event times are reported both absolute and as milliseconds since the
    /// collector started.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build_report())
    }

    /// Writes [`Self::export_json`] to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Io`] when serialization or the write
    /// fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.export_json().map_err(std::io::Error::from)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn build_report(&self) -> Report<'_> {
        Report {
            metadata: ReportMetadata {
                crate_version: env!("CARGO_PKG_VERSION"),
                collection_started_at: self.started_at.to_rfc3339(),
                generated_at: Utc::now().to_rfc3339(),
                event_count: self.events.len(),
            },
            events: self
                .events
                .iter()
                .map(|event| ReportEvent {
                    timestamp: event.timestamp.to_rfc3339(),
                    offset_ms: (event.timestamp - self.started_at).num_milliseconds().max(0),
                    kind: &event.kind,
                })
                .collect(),
        }
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

#[derive(Serialize)]
struct Report<'a> {
    metadata: ReportMetadata,
    events: Vec<ReportEvent<'a>>,
}

#[derive(Serialize)]
struct ReportMetadata {
    crate_version: &'static str,
    collection_started_at: String,
    generated_at: String,
    event_count: usize,
}

#[derive(Serialize)]
struct ReportEvent<'a> {
    timestamp: String,
    offset_ms: i64,
    #[serde(flatten)]
    kind: &'a DiagnosticEventKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    #[test]
    fn handle_events_arrive_after_processing() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        handle.log_action(UserAction::Undo);
        handle.log_warning("layout unavailable");
        assert!(collector.is_empty());

        collector.process_pending();
        let kinds: Vec<_> = collector.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticEventKind::UserAction {
                    action: UserAction::Undo,
                    details: None
                },
                DiagnosticEventKind::Warning {
                    message: "layout unavailable".into()
                },
            ]
        );
    }

    #[test]
    fn cloned_handles_share_the_collector() {
        let mut collector = DiagnosticsCollector::default();
        let a = collector.handle();
        let b = a.clone();
        a.log_action(UserAction::Redo);
        b.log_action(UserAction::ApplyCrop);
        collector.process_pending();
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn log_keeps_only_the_newest_events() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(50));
        let handle = collector.handle();
        for _ in 0..2 {
            for i in 0..40 {
                handle.log_action(UserAction::PlaceHotspot { x: i, y: 0 });
            }
            collector.process_pending();
        }
        assert_eq!(collector.len(), 50);
        assert!(matches!(
            collector.iter().last().map(|e| &e.kind),
            Some(DiagnosticEventKind::UserAction {
                action: UserAction::PlaceHotspot { x: 39, .. },
                ..
            })
        ));
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();
        for _ in 0..=CHANNEL_CAPACITY {
            handle.log_action(UserAction::Undo);
        }
        handle.log_action(UserAction::Redo);

        collector.process_pending();
        assert_eq!(collector.len(), CHANNEL_CAPACITY);
        assert!(collector.iter().all(|event| matches!(
            event.kind,
            DiagnosticEventKind::UserAction {
                action: UserAction::Undo,
                ..
            }
        )));
    }

    #[test]
    fn action_details_are_exported() {
        let mut collector = DiagnosticsCollector::default();
        collector.handle().log_action_with_details(
            UserAction::LoadImage { source: None },
            Some("800x600".into()),
        );
        collector.process_pending();

        let json = collector.export_json().expect("export");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["events"][0]["action"]["action"], "load_image");
        assert_eq!(value["events"][0]["details"], "800x600");
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(60));
        collector.handle().log_action(UserAction::Undo);
        collector.process_pending();
        collector.clear();
        assert!(collector.is_empty());
        assert_eq!(collector.capacity(), 60);
    }

    #[test]
    fn export_json_contains_metadata_and_events() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();
        handle.log_error(ErrorEvent::new(ErrorType::Collaborator, "quota exceeded"));
        handle.log_operation(AppOperation::Crop {
            width: 200,
            height: 160,
            duration_ms: 3,
        });
        collector.process_pending();

        let json = collector.export_json().expect("export");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["metadata"]["event_count"], 2);
        assert_eq!(value["events"][0]["type"], "error");
        assert_eq!(value["events"][0]["event"]["message"], "quota exceeded");
        assert_eq!(value["events"][1]["operation"]["operation"], "crop");
        assert_eq!(value["events"][1]["operation"]["width"], 200);
        assert!(value["events"][1]["offset_ms"].as_i64().is_some());
    }

    #[test]
    fn export_to_file_writes_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("diagnostics.json");
        let mut collector = DiagnosticsCollector::default();
        collector.handle().log_action(UserAction::ResetToOriginal);
        collector.process_pending();

        collector.export_to_file(&path).expect("export");
        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains("reset_to_original"));
    }
}
