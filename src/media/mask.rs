// SPDX-License-Identifier: MPL-2.0
//! Paint mask for magic fill.
//!
//! The mask is painted in rendered space (what the user sees) and only
//! resized to the natural grid when it is handed to the inpaint
//! collaborator. White marks the area to regenerate.

use crate::domain::editing::BrushRadius;
use crate::error::{Error, Result};
use crate::media::image_buffer::ImageBuffer;
use iced_core::{Point, Size};
use image_rs::imageops::FilterType;
use image_rs::{DynamicImage, GrayImage, Luma};

/// Operation label for exported masks.
pub const MASK_OPERATION: &str = "mask";

const PAINTED: Luma<u8> = Luma([255]);
const CLEARED: Luma<u8> = Luma([0]);

/// Whether a stroke adds to or removes from the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushMode {
    #[default]
    Paint,
    Erase,
}

/// Binary mask raster sized to the rendered image.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintMask {
    raster: GrayImage,
}

impl PaintMask {
    /// Creates an empty mask for an image laid out at `rendered`.
    ///
    /// Returns `None` while layout is unavailable.
    #[must_use]
    pub fn new(rendered: Size) -> Option<Self> {
        let width = raster_length(rendered.width)?;
        let height = raster_length(rendered.height)?;
        Some(Self {
            raster: GrayImage::new(width, height),
        })
    }

    /// Raster size in rendered pixels.
    #[must_use]
    pub fn size(&self) -> Size<u32> {
        Size::new(self.raster.width(), self.raster.height())
    }

    /// True when no pixel is painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raster.pixels().all(|p| p.0[0] == 0)
    }

    /// Wipes the whole mask.
    pub fn clear(&mut self) {
        self.raster.pixels_mut().for_each(|p| *p = CLEARED);
    }

    /// Stamps one disk centred at `center`.
    pub fn stamp(&mut self, center: Point, radius: BrushRadius, mode: BrushMode) {
        let value = match mode {
            BrushMode::Paint => PAINTED,
            BrushMode::Erase => CLEARED,
        };
        #[allow(clippy::cast_precision_loss)]
        let r = radius.value() as f32;
        let (width, height) = self.raster.dimensions();
        let (Some((x0, x1)), Some((y0, y1))) = (
            span(center.x, r, width),
            span(center.y, r, height),
        ) else {
            return;
        };

        for py in y0..y1 {
            for px in x0..x1 {
                #[allow(clippy::cast_precision_loss)]
                let (dx, dy) = (px as f32 + 0.5 - center.x, py as f32 + 0.5 - center.y);
                if dx * dx + dy * dy <= r * r {
                    self.raster.put_pixel(px, py, value);
                }
            }
        }
    }

    /// Stamps disks along the segment `from -> to` so fast drags leave no gaps.
    ///
    /// Only the part of the segment that can reach the raster is walked, so
    /// the number of stamps is bounded by the raster size.
    pub fn stroke(&mut self, from: Point, to: Point, radius: BrushRadius, mode: BrushMode) {
        #[allow(clippy::cast_precision_loss)]
        let r = radius.value() as f32;
        let (width, height) = self.raster.dimensions();
        #[allow(clippy::cast_precision_loss)]
        let reach = (
            Point::new(-r, -r),
            Point::new(width as f32 + r, height as f32 + r),
        );
        let Some((from, to)) = clip_segment(from, to, reach.0, reach.1) else {
            return;
        };

        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let spacing = (r * 0.4).max(1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (dx.hypot(dy) / spacing).ceil() as u32;
        for step in 0..=steps {
            #[allow(clippy::cast_precision_loss)]
            let t = if steps == 0 {
                0.0
            } else {
                step as f32 / steps as f32
            };
            self.stamp(Point::new(from.x + dx * t, from.y + dy * t), radius, mode);
        }
    }

    /// Whether the rendered pixel under `point` is painted.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn is_painted(&self, point: Point) -> bool {
        if point.x < 0.0 || point.y < 0.0 {
            return false;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        x < self.raster.width() && y < self.raster.height() && self.raster.get_pixel(x, y).0[0] > 0
    }

    /// Exports the mask at the image's natural size as a PNG snapshot.
    ///
    /// Nearest-neighbour resampling keeps the mask strictly binary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] when `natural` is empty or encoding fails.
    pub fn to_image_buffer(&self, natural: Size<u32>) -> Result<ImageBuffer> {
        if natural.width == 0 || natural.height == 0 {
            return Err(Error::Image("mask target has empty dimensions".into()));
        }
        let resized = image_rs::imageops::resize(
            &self.raster,
            natural.width,
            natural.height,
            FilterType::Nearest,
        );
        ImageBuffer::from_dynamic_png(&DynamicImage::ImageLuma8(resized), MASK_OPERATION)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn raster_length(length: f32) -> Option<u32> {
    let rounded = length.round();
    (rounded.is_finite() && rounded >= 1.0 && rounded <= f32::from(u16::MAX)).then(|| rounded as u32)
}

/// Half-open pixel range covered by `[center - r, center + r]`, clipped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn span(center: f32, radius: f32, limit: u32) -> Option<(u32, u32)> {
    if !center.is_finite() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let max = limit as f32;
    let start = (center - radius).floor().clamp(0.0, max) as u32;
    let end = (center + radius).ceil().clamp(0.0, max) as u32;
    (start < end).then_some((start, end))
}

/// Part of the segment `from -> to` inside the box `min..=max`
/// (Liang-Barsky), or `None` when it misses the box or is not finite.
///
/// Computed in `f64` so far-away endpoints keep sub-pixel precision.
#[allow(clippy::cast_possible_truncation)]
fn clip_segment(from: Point, to: Point, min: Point, max: Point) -> Option<(Point, Point)> {
    let coords = [from.x, from.y, to.x, to.y];
    if coords.iter().any(|c| !c.is_finite()) {
        return None;
    }
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, x0 - f64::from(min.x)),
        (dx, f64::from(max.x) - x0),
        (-dy, y0 - f64::from(min.y)),
        (dy, f64::from(max.y) - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| Point::new((x0 + dx * t) as f32, (y0 + dy * t) as f32);
    Some((at(t0), at(t1)))
}
