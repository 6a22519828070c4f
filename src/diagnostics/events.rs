// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types recorded by an editing session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::EditError;

/// User-initiated actions worth correlating with later failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// A new image replaced the session content.
    LoadImage {
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },

    /// Switched the active editor tool.
    SelectTool { tool: String },

    /// Placed the retouch hotspot.
    PlaceHotspot { x: u32, y: u32 },

    /// Committed a crop selection.
    ApplyCrop,

    /// Sent a request to the generative collaborator.
    SubmitEdit { kind: String },

    Undo,

    Redo,

    /// Jumped back to the originally loaded snapshot.
    ResetToOriginal,

    DismissError,
}

/// Completed pieces of work with their cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum AppOperation {
    /// A collaborator round trip that produced a new snapshot or an answer.
    Edit { kind: String, duration_ms: u64 },

    /// A crop rasterization and the size of its output.
    Crop {
        width: u32,
        height: u32,
        duration_ms: u64,
    },
}

/// Categories of recorded errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// A user-correctable precondition was not met.
    Precondition,
    /// The collaborator failed or refused.
    Collaborator,
    /// Local pixel processing could not run.
    Processing,
    /// Reading or decoding input failed.
    Io,
    Other,
}

/// An error with its category and translation key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEvent {
    pub error_type: ErrorType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i18n_key: Option<String>,
}

impl ErrorEvent {
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            i18n_key: None,
        }
    }
}

impl From<&EditError> for ErrorEvent {
    fn from(error: &EditError) -> Self {
        let error_type = if error.is_precondition() {
            ErrorType::Precondition
        } else if error.is_collaborator_failure() {
            ErrorType::Collaborator
        } else {
            ErrorType::Processing
        };
        Self {
            error_type,
            message: error.to_string(),
            i18n_key: Some(error.i18n_key().to_string()),
        }
    }
}

/// Payload of a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    Operation {
        operation: AppOperation,
    },
    Warning {
        message: String,
    },
    Error {
        event: ErrorEvent,
    },
}

/// A timestamped diagnostic event.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self::with_timestamp(kind, Utc::now())
    }

    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_action_serializes_with_tag() {
        let kind = DiagnosticEventKind::UserAction {
            action: UserAction::SubmitEdit {
                kind: "retouch".into(),
            },
            details: None,
        };
        let json = serde_json::to_string(&kind).expect("serialize");
        assert!(json.contains("\"type\":\"user_action\""));
        assert!(json.contains("\"action\":\"submit_edit\""));
        assert!(json.contains("\"kind\":\"retouch\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn error_event_deserializes_from_json() {
        let json = r#"{"type":"error","event":{"error_type":"collaborator","message":"boom"}}"#;
        let kind: DiagnosticEventKind = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            kind,
            DiagnosticEventKind::Error {
                event: ErrorEvent::new(ErrorType::Collaborator, "boom")
            }
        );
    }

    #[test]
    fn edit_errors_are_categorized() {
        assert_eq!(
            ErrorEvent::from(&EditError::NoHotspot).error_type,
            ErrorType::Precondition
        );
        assert_eq!(
            ErrorEvent::from(&EditError::Blocked("SAFETY".into())).error_type,
            ErrorType::Collaborator
        );
        let event = ErrorEvent::from(&EditError::ProcessingUnavailable("no canvas".into()));
        assert_eq!(event.error_type, ErrorType::Processing);
        assert_eq!(
            event.i18n_key.as_deref(),
            Some(EditError::ProcessingUnavailable(String::new()).i18n_key())
        );
    }
}
