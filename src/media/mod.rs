// SPDX-License-Identifier: MPL-2.0
//! Image snapshots and the pixel-level operations performed on them.
//!
//! - [`image_buffer`]: immutable encoded snapshots and data-URL handling
//! - [`display`]: revocable renderer handles, one live handle per slot
//! - [`coordinates`]: rendered ↔ natural coordinate mapping
//! - [`crop`]: rendered selection → new PNG snapshot at device density
//! - [`mask`]: paint mask exported for magic fill

pub mod coordinates;
pub mod crop;
pub mod display;
pub mod image_buffer;
pub mod mask;

pub use coordinates::Scale;
pub use crop::{CropRasterizer, CropRequest};
pub use display::{DisplayHandle, DisplaySlot};
pub use image_buffer::{ImageBuffer, SnapshotId};
pub use mask::{BrushMode, PaintMask};
