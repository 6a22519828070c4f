// SPDX-License-Identifier: MPL-2.0
//! Edit failure taxonomy.

use std::fmt;

/// Everything that can stop an edit from producing a new snapshot.
///
/// Variants fall in three groups:
/// - precondition errors, detected before any collaborator call and always
///   user-correctable;
/// - collaborator failures, reported after an asynchronous call resolves;
/// - resource failures, raised by local rasterization.
///
/// None of them leave the history in a modified state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// No image has been loaded into the session.
    NoImage,
    /// The prompt is empty or whitespace only.
    EmptyPrompt,
    /// A localized retouch was requested without a hotspot.
    NoHotspot,
    /// A magic fill was requested with an empty mask.
    NoMask,
    /// A crop was requested without a completed selection.
    NoCropSelection,
    /// A submission is already in flight on this surface.
    Busy,

    /// The collaborator call failed (network, quota, generation error).
    Generation(String),
    /// The collaborator refused the request.
    Blocked(String),
    /// The collaborator answered with data that is not a decodable image.
    MalformedResult(String),

    /// Local rasterization could not acquire or produce a surface.
    ProcessingUnavailable(String),
}

impl EditError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            EditError::NoImage => "error-edit-no-image",
            EditError::EmptyPrompt => "error-edit-empty-prompt",
            EditError::NoHotspot => "error-edit-no-hotspot",
            EditError::NoMask => "error-edit-no-mask",
            EditError::NoCropSelection => "error-edit-no-crop-selection",
            EditError::Busy => "error-edit-busy",
            EditError::Generation(_) => "error-edit-generation",
            EditError::Blocked(_) => "error-edit-blocked",
            EditError::MalformedResult(_) => "error-edit-malformed-result",
            EditError::ProcessingUnavailable(_) => "error-edit-processing-unavailable",
        }
    }

    /// Returns true for errors the user fixes by changing the selection or prompt.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EditError::NoImage
                | EditError::EmptyPrompt
                | EditError::NoHotspot
                | EditError::NoMask
                | EditError::NoCropSelection
                | EditError::Busy
        )
    }

    /// Returns true for failures reported by an external collaborator.
    #[must_use]
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            EditError::Generation(_) | EditError::Blocked(_) | EditError::MalformedResult(_)
        )
    }
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NoImage => write!(f, "No image loaded to edit"),
            EditError::EmptyPrompt => write!(f, "Please enter a description of your edit"),
            EditError::NoHotspot => write!(f, "Please click on the image to select an area to edit"),
            EditError::NoMask => write!(f, "Please paint over the area you want to fill"),
            EditError::NoCropSelection => write!(f, "Please select an area to crop"),
            EditError::Busy => write!(f, "Another edit is still in progress"),
            EditError::Generation(msg) => write!(f, "Failed to generate the image: {msg}"),
            EditError::Blocked(reason) => write!(f, "Request was blocked: {reason}"),
            EditError::MalformedResult(msg) => write!(f, "Malformed result: {msg}"),
            EditError::ProcessingUnavailable(msg) => {
                write!(f, "Image processing unavailable: {msg}")
            }
        }
    }
}

impl std::error::Error for EditError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_are_classified() {
        assert!(EditError::NoHotspot.is_precondition());
        assert!(EditError::Busy.is_precondition());
        assert!(!EditError::Generation("timeout".into()).is_precondition());
        assert!(!EditError::ProcessingUnavailable("no surface".into()).is_precondition());
    }

    #[test]
    fn collaborator_failures_are_classified() {
        assert!(EditError::Blocked("SAFETY".into()).is_collaborator_failure());
        assert!(EditError::MalformedResult("not base64".into()).is_collaborator_failure());
        assert!(!EditError::NoMask.is_collaborator_failure());
    }

    #[test]
    fn display_includes_detail() {
        let err = EditError::Generation("quota exceeded".into());
        assert!(format!("{err}").contains("quota exceeded"));

        let err = EditError::Blocked("SAFETY".into());
        assert_eq!(format!("{err}"), "Request was blocked: SAFETY");
    }

    #[test]
    fn i18n_keys_are_stable() {
        assert_eq!(EditError::NoImage.i18n_key(), "error-edit-no-image");
        assert_eq!(
            EditError::NoCropSelection.i18n_key(),
            "error-edit-no-crop-selection"
        );
        assert_eq!(
            EditError::MalformedResult(String::new()).i18n_key(),
            "error-edit-malformed-result"
        );
    }
}
