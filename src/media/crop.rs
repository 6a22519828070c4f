// SPDX-License-Identifier: MPL-2.0
//! Crop rasterization: a rendered selection becomes a new lossless snapshot.
//!
//! The selection is expressed in rendered coordinates. It is mapped onto the
//! natural grid to pick the source pixels, and the output surface is sized
//! from the *rendered* selection times the device pixel ratio, so the result
//! matches the physical resolution of the surface that requested it. One
//! resample covers both the natural-to-rendered change and the density
//! upscale.

use crate::config::{ResampleFilter, DEFAULT_MAX_OUTPUT_DIMENSION};
use crate::domain::editing::DevicePixelRatio;
use crate::domain::error::EditError;
use crate::media::coordinates::{clamp_to_bounds, Scale};
use crate::media::image_buffer::ImageBuffer;
use iced_core::{Rectangle, Size};

/// Operation label for generated crop snapshots.
pub const CROP_OPERATION: &str = "cropped";

/// Everything the rasterizer needs besides the source snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRequest {
    /// Completed selection in rendered coordinates.
    pub selection: Rectangle,
    /// Size the source is currently laid out at.
    pub rendered: Size,
    /// Physical-to-logical ratio of the requesting surface.
    pub density: DevicePixelRatio,
}

/// Rasterizer settings, usually taken from [`crate::config::Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRasterizer {
    filter: ResampleFilter,
    max_output_dimension: u32,
}

impl Default for CropRasterizer {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::default(),
            max_output_dimension: DEFAULT_MAX_OUTPUT_DIMENSION,
        }
    }
}

impl CropRasterizer {
    #[must_use]
    pub fn new(filter: ResampleFilter, max_output_dimension: u32) -> Self {
        Self {
            filter,
            max_output_dimension,
        }
    }

    /// Pixel size of the surface a request would allocate.
    ///
    /// Returns `None` for an empty selection.
    #[must_use]
    pub fn output_size(request: &CropRequest) -> Option<Size<u32>> {
        let selection = clamp_to_bounds(request.selection, request.rendered);
        // NaN extents fail both comparisons.
        if !(selection.width > 0.0 && selection.height > 0.0) {
            return None;
        }
        Some(Size::new(
            request.density.scale_length(selection.width),
            request.density.scale_length(selection.height),
        ))
    }

    /// Produces a new PNG snapshot containing only the selected region.
    ///
    /// Synchronous and atomic: either a complete buffer is returned or
    /// nothing is.
    ///
    /// # Errors
    ///
    /// - [`EditError::NoCropSelection`] when the selection is empty after
    ///   clamping to the rendered bounds.
    /// - [`EditError::ProcessingUnavailable`] when layout is missing, the
    ///   source cannot be decoded, the output surface would exceed the
    ///   configured limit, or encoding fails.
    pub fn rasterize(
        &self,
        source: &ImageBuffer,
        request: &CropRequest,
    ) -> Result<ImageBuffer, EditError> {
        let output = Self::output_size(request).ok_or(EditError::NoCropSelection)?;
        let scale = Scale::between(
            request.rendered,
            Size::new(source.width(), source.height()),
        )
        .ok_or_else(|| EditError::ProcessingUnavailable("image has no layout yet".into()))?;

        if output.width > self.max_output_dimension || output.height > self.max_output_dimension {
            return Err(EditError::ProcessingUnavailable(format!(
                "a {}x{} surface exceeds the {} pixel limit",
                output.width, output.height, self.max_output_dimension
            )));
        }

        let region = scale.rect_to_natural(clamp_to_bounds(request.selection, request.rendered));
        let decoded = source
            .decode()
            .map_err(|e| EditError::ProcessingUnavailable(e.to_string()))?;

        let cropped = decoded
            .crop_imm(region.x, region.y, region.width, region.height)
            .resize_exact(output.width, output.height, self.filter.filter_type());

        ImageBuffer::from_dynamic_png(&cropped, CROP_OPERATION)
            .map_err(|e| EditError::ProcessingUnavailable(e.to_string()))
    }
}
