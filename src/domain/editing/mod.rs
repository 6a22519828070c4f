// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! This module provides pure domain types for image editing operations:
//! - [`DevicePixelRatio`]: Physical-to-logical pixel ratio of the output surface
//! - [`BrushRadius`]: Radius of the mask brush
//! - [`EditKind`] / [`Requirement`]: Submission kinds and their preconditions
//! - [`EditorTool`]: Interaction mode of the editing surface

pub mod kind;
pub mod newtypes;

pub use kind::{EditKind, EditorTool, Requirement};
pub use newtypes::{BrushRadius, DevicePixelRatio};
