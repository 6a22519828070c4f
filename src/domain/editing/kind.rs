// SPDX-License-Identifier: MPL-2.0
//! Edit kinds, editor tools and the precondition table shared by every
//! submission path.

use std::fmt;

/// Interaction mode of the editing surface.
///
/// The active tool decides how pointer input is interpreted: clicks place a
/// hotspot only in [`EditorTool::Retouch`], strokes paint the mask only in
/// [`EditorTool::Fill`], drags select a region only in [`EditorTool::Crop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Retouch,
    Fill,
    Crop,
    Adjust,
    Style,
    Analyze,
}

/// Kinds of collaborator-backed submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Retouch,
    MagicFill,
    Style,
    Adjust,
    Analyze,
}

/// A piece of session state that must be present before a submission starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// An image is loaded.
    Image,
    /// The prompt contains non-whitespace text.
    Prompt,
    /// A hotspot has been committed.
    Hotspot,
    /// The paint mask has at least one selected pixel.
    Mask,
}

impl EditKind {
    /// Returns the session state each kind needs, checked in order.
    ///
    /// This is the single place validation rules live; the orchestrator walks
    /// the list and reports the first unmet requirement.
    #[must_use]
    pub fn requirements(self) -> &'static [Requirement] {
        match self {
            EditKind::Retouch => &[Requirement::Image, Requirement::Prompt, Requirement::Hotspot],
            EditKind::MagicFill => &[Requirement::Image, Requirement::Mask, Requirement::Prompt],
            EditKind::Style | EditKind::Adjust | EditKind::Analyze => {
                &[Requirement::Image, Requirement::Prompt]
            }
        }
    }

    /// Operation label used in generated snapshot names.
    #[must_use]
    pub fn operation_name(self) -> &'static str {
        match self {
            EditKind::Retouch => "edited",
            EditKind::MagicFill => "filled",
            EditKind::Style => "styled",
            EditKind::Adjust => "adjusted",
            EditKind::Analyze => "analyzed",
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditKind::Retouch => "retouch",
            EditKind::MagicFill => "magic_fill",
            EditKind::Style => "style",
            EditKind::Adjust => "adjust",
            EditKind::Analyze => "analyze",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_requires_an_image_first() {
        for kind in [
            EditKind::Retouch,
            EditKind::MagicFill,
            EditKind::Style,
            EditKind::Adjust,
            EditKind::Analyze,
        ] {
            assert_eq!(kind.requirements().first(), Some(&Requirement::Image));
        }
    }

    #[test]
    fn retouch_needs_hotspot_and_fill_needs_mask() {
        assert!(EditKind::Retouch.requirements().contains(&Requirement::Hotspot));
        assert!(!EditKind::Retouch.requirements().contains(&Requirement::Mask));
        assert!(EditKind::MagicFill.requirements().contains(&Requirement::Mask));
        assert!(!EditKind::Style.requirements().contains(&Requirement::Hotspot));
    }
}
