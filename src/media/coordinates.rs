// SPDX-License-Identifier: MPL-2.0
//! Mapping between rendered (display) space and the image's natural pixel grid.
//!
//! An image element is laid out at some rendered size while its pixels live
//! on a natural grid of possibly different resolution, independently per
//! axis. Everything here is pure:
//!
//! ```text
//! scale_x   = natural_width  / rendered_width
//! scale_y   = natural_height / rendered_height
//! natural_x = round(local_x * scale_x)
//! natural_y = round(local_y * scale_y)
//! ```
//!
//! Rounding uses [`f64::round`], i.e. halves round away from zero, on both
//! axes. Rounded coordinates are clamped into `[0, natural]`.
//!
//! A rendered width or height of zero means the element has not been laid
//! out yet; every mapping then returns `None` instead of dividing by zero.

use iced_core::{Point, Rectangle, Size};

/// Per-axis natural-per-rendered ratio for one laid-out element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    x: f64,
    y: f64,
    natural: Size<u32>,
}

impl Scale {
    /// Builds the ratio, or `None` when layout is unavailable.
    #[must_use]
    pub fn between(rendered: Size, natural: Size<u32>) -> Option<Self> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !usable(rendered.width) || !usable(rendered.height) {
            return None;
        }
        if natural.width == 0 || natural.height == 0 {
            return None;
        }
        Some(Self {
            x: f64::from(natural.width) / f64::from(rendered.width),
            y: f64::from(natural.height) / f64::from(rendered.height),
            natural,
        })
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Maps a rendered-local point onto the natural grid.
    #[must_use]
    pub fn to_natural(&self, local: Point) -> Point<u32> {
        Point::new(
            round_clamped(f64::from(local.x) * self.x, self.natural.width),
            round_clamped(f64::from(local.y) * self.y, self.natural.height),
        )
    }

    /// Maps a natural point back to rendered-local space (inverse scale).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_rendered(&self, natural: Point<u32>) -> Point {
        Point::new(
            (f64::from(natural.x) / self.x) as f32,
            (f64::from(natural.y) / self.y) as f32,
        )
    }

    /// Maps a rendered rectangle onto the natural grid.
    ///
    /// Origin and extent are scaled and rounded independently, then clamped
    /// so the region lies inside the image and covers at least one pixel.
    #[must_use]
    pub fn rect_to_natural(&self, rect: Rectangle) -> Rectangle<u32> {
        let max_x = self.natural.width.saturating_sub(1);
        let max_y = self.natural.height.saturating_sub(1);
        let x = round_clamped(f64::from(rect.x) * self.x, max_x);
        let y = round_clamped(f64::from(rect.y) * self.y, max_y);
        let width = round_clamped(f64::from(rect.width) * self.x, self.natural.width - x).max(1);
        let height = round_clamped(f64::from(rect.height) * self.y, self.natural.height - y).max(1);
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }
}

/// Maps a rendered-local point to natural pixels in one call.
///
/// Returns `None` while layout is unavailable.
///
/// # Example
///
/// ```
/// use iced_core::{Point, Size};
/// use retouch_lens::media::coordinates::to_natural;
///
/// let natural = to_natural(Point::new(100.0, 150.0), Size::new(400.0, 300.0), Size::new(800, 600));
/// assert_eq!(natural, Some(Point::new(200, 300)));
/// ```
#[must_use]
pub fn to_natural(local: Point, rendered: Size, natural: Size<u32>) -> Option<Point<u32>> {
    Scale::between(rendered, natural).map(|scale| scale.to_natural(local))
}

/// Maps a natural pixel back to rendered-local space.
#[must_use]
pub fn to_rendered(point: Point<u32>, rendered: Size, natural: Size<u32>) -> Option<Point> {
    Scale::between(rendered, natural).map(|scale| scale.to_rendered(point))
}

/// Clamps a rendered rectangle to `[0, bounds]` on both axes, normalizing
/// negative extents.
#[must_use]
pub fn clamp_to_bounds(rect: Rectangle, bounds: Size) -> Rectangle {
    let limit = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let bounds = Size::new(limit(bounds.width), limit(bounds.height));
    let (x0, x1) = ordered(rect.x, rect.x + rect.width);
    let (y0, y1) = ordered(rect.y, rect.y + rect.height);
    let x0 = x0.clamp(0.0, bounds.width);
    let x1 = x1.clamp(0.0, bounds.width);
    let y0 = y0.clamp(0.0, bounds.height);
    let y1 = y1.clamp(0.0, bounds.height);
    Rectangle {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// The value is clamped to [0, max] before the cast, so it always fits.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_clamped(value: f64, max: u32) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(max)) as u32
}
