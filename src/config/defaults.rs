// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Editor**: Mask brush radius
//! - **Crop**: Output density and maximum surface dimension
//! - **Diagnostics**: Event buffer capacity

// ==========================================================================
// Editor Defaults
// ==========================================================================

/// Default magic-fill brush radius (rendered pixels).
pub const DEFAULT_BRUSH_RADIUS: u32 = 40;

/// Smallest brush radius.
pub const MIN_BRUSH_RADIUS: u32 = 1;

/// Largest brush radius.
pub const MAX_BRUSH_RADIUS: u32 = 200;

// ==========================================================================
// Crop Defaults
// ==========================================================================

/// Device pixel ratio used when the host does not report one.
pub const DEFAULT_DEVICE_PIXEL_RATIO: f32 = 1.0;

/// Largest width or height the crop rasterizer will allocate.
///
/// Matches the common texture limit of GPU-backed drawing surfaces.
pub const DEFAULT_MAX_OUTPUT_DIMENSION: u32 = 16_384;

/// Lower bound accepted for the configured maximum output dimension.
pub const MIN_MAX_OUTPUT_DIMENSION: u32 = 256;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of diagnostic events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 500;

/// Minimum diagnostic buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 50;

/// Maximum diagnostic buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 5000;
