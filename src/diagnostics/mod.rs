// SPDX-License-Identifier: MPL-2.0
//! In-memory activity log for editing sessions.
//!
//! - [`DiagnosticEvent`]: timestamped user actions, operations, warnings and errors
//! - [`DiagnosticsCollector`] / [`DiagnosticsHandle`]: channel-fed collection
//!   into a bounded log, and JSON export

mod collector;
mod events;

pub use crate::domain::diagnostics::BufferCapacity;
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{
    AppOperation, DiagnosticEvent, DiagnosticEventKind, ErrorEvent, ErrorType, UserAction,
};
