// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and in-memory images.
//!
//! Re-exports the `approx` assertion macros, which handle floating-point
//! precision where `assert_eq!` cannot.

pub use approx::assert_abs_diff_eq;

use crate::media::image_buffer::ImageBuffer;
use image_rs::{DynamicImage, Rgba, RgbaImage};

/// Encodes a solid `width` x `height` PNG snapshot.
pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> ImageBuffer {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    ImageBuffer::from_dynamic_png(&DynamicImage::ImageRgba8(image), "test").expect("encode png")
}
