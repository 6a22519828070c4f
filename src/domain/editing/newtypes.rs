// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! Type-safe wrappers for values fed into the crop rasterizer and the mask
//! brush, clamped to the ranges those operations accept.

// =============================================================================
// Device Pixel Ratio Bounds
// =============================================================================

/// Device pixel ratio bounds (1x to 8x).
pub mod density_bounds {
    /// Minimum density; output surfaces never have fewer physical than logical pixels.
    pub const MIN: f32 = 1.0;
    /// Maximum density accepted for rasterization.
    pub const MAX: f32 = 8.0;
    /// Default density (one physical pixel per layout pixel).
    pub const DEFAULT: f32 = 1.0;
}

// =============================================================================
// DevicePixelRatio
// =============================================================================

/// Ratio of physical output pixels to logical layout pixels.
///
/// The crop rasterizer applies this factor to the *rendered* selection size,
/// so a 100×80 selection at density 2 produces a 200×160 raster whatever the
/// natural resolution of the source image.
///
/// Non-finite values fall back to the default; finite values are clamped.
///
/// # Example
///
/// ```
/// use retouch_lens::domain::editing::DevicePixelRatio;
///
/// let density = DevicePixelRatio::new(2.0);
/// assert_eq!(density.scale_length(100.0), 200);
/// assert_eq!(DevicePixelRatio::new(0.5).value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePixelRatio(f32);

impl DevicePixelRatio {
    /// Creates a new density, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(density_bounds::MIN, density_bounds::MAX))
        } else {
            Self::default()
        }
    }

    /// Returns the raw ratio.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Scales a logical length to physical pixels, rounding to the nearest
    /// pixel and never returning less than one.
    #[must_use]
    // The conditional guarantees value is <= u32::MAX, so cast is safe
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scale_length(self, logical: f32) -> u32 {
        let physical = (f64::from(logical) * f64::from(self.0)).round().max(1.0);
        if physical > f64::from(u32::MAX) {
            u32::MAX
        } else {
            physical as u32
        }
    }
}

impl Default for DevicePixelRatio {
    fn default() -> Self {
        Self(density_bounds::DEFAULT)
    }
}

// =============================================================================
// Brush Radius Bounds
// =============================================================================

/// Mask brush radius bounds, in rendered pixels.
pub mod brush_bounds {
    /// Smallest brush.
    pub const MIN: u32 = 1;
    /// Largest brush.
    pub const MAX: u32 = 200;
    /// Default brush.
    pub const DEFAULT: u32 = 40;
}

// =============================================================================
// BrushRadius
// =============================================================================

/// Radius of the circular brush used to paint the magic-fill mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushRadius(u32);

impl BrushRadius {
    /// Creates a new brush radius, clamping to valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(brush_bounds::MIN, brush_bounds::MAX))
    }

    /// Returns the radius in rendered pixels.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for BrushRadius {
    fn default() -> Self {
        Self(brush_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // DevicePixelRatio tests
    // -------------------------------------------------------------------------

    #[test]
    fn density_clamps_below_one() {
        assert!((DevicePixelRatio::new(0.25).value() - density_bounds::MIN).abs() < f32::EPSILON);
        assert!((DevicePixelRatio::new(32.0).value() - density_bounds::MAX).abs() < f32::EPSILON);
        assert!((DevicePixelRatio::new(1.5).value() - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn density_rejects_non_finite() {
        assert_eq!(DevicePixelRatio::new(f32::NAN), DevicePixelRatio::default());
        assert_eq!(
            DevicePixelRatio::new(f32::INFINITY),
            DevicePixelRatio::default()
        );
    }

    #[test]
    fn density_scales_lengths() {
        let density = DevicePixelRatio::new(2.0);
        assert_eq!(density.scale_length(100.0), 200);
        assert_eq!(density.scale_length(80.0), 160);

        let fractional = DevicePixelRatio::new(1.5);
        assert_eq!(fractional.scale_length(3.0), 5); // 4.5 rounds away from zero
    }

    #[test]
    fn density_scale_never_below_one_pixel() {
        assert_eq!(DevicePixelRatio::default().scale_length(0.0), 1);
        assert_eq!(DevicePixelRatio::default().scale_length(0.2), 1);
    }

    // -------------------------------------------------------------------------
    // BrushRadius tests
    // -------------------------------------------------------------------------

    #[test]
    fn brush_radius_clamps() {
        assert_eq!(BrushRadius::new(0).value(), brush_bounds::MIN);
        assert_eq!(BrushRadius::new(10_000).value(), brush_bounds::MAX);
        assert_eq!(BrushRadius::new(25).value(), 25);
    }

    #[test]
    fn brush_radius_default() {
        assert_eq!(BrushRadius::default().value(), brush_bounds::DEFAULT);
    }
}
