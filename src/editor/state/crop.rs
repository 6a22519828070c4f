// SPDX-License-Identifier: MPL-2.0
//! Crop tool state: drag selection, aspect constraints and applying the crop.

use std::time::Instant;

use super::elapsed_ms;
use crate::diagnostics::{AppOperation, UserAction};
use crate::domain::editing::EditorTool;
use crate::domain::error::EditError;
use crate::editor::Session;
use crate::media::coordinates::clamp_to_bounds;
use crate::media::crop::CropRequest;
use crate::media::image_buffer::{ImageBuffer, SnapshotId};
use iced_core::{Point, Rectangle, Size};

/// Crop aspect ratio constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropRatio {
    #[default]
    Free,
    Square,    // 1:1
    Landscape, // 16:9
    Photo,     // 4:3
}

impl CropRatio {
    /// Width over height, or `None` for free selection.
    #[must_use]
    pub fn aspect(self) -> Option<f32> {
        match self {
            CropRatio::Free => None,
            CropRatio::Square => Some(1.0),
            CropRatio::Landscape => Some(16.0 / 9.0),
            CropRatio::Photo => Some(4.0 / 3.0),
        }
    }
}

/// Crop selection in rendered coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropState {
    ratio: CropRatio,
    /// Where the current drag started.
    anchor: Option<Point>,
    /// Rectangle under construction while dragging.
    current: Option<Rectangle>,
    /// Finalized rectangle the rasterizer will use.
    completed: Option<Rectangle>,
}

impl CropState {
    #[must_use]
    pub fn ratio(&self) -> CropRatio {
        self.ratio
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<Rectangle> {
        self.current
    }

    #[must_use]
    pub fn completed(&self) -> Option<Rectangle> {
        self.completed
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.current.is_some() || self.completed.is_some()
    }

    pub(crate) fn begin(&mut self, point: Point, bounds: Size) {
        let anchor = clamp_point(point, bounds);
        self.anchor = Some(anchor);
        self.current = Some(Rectangle::new(anchor, Size::ZERO));
        self.completed = None;
    }

    pub(crate) fn update(&mut self, point: Point, bounds: Size) {
        if let Some(anchor) = self.anchor {
            self.current = Some(constrained(anchor, clamp_point(point, bounds), self.ratio));
        }
    }

    /// Ends the drag; a zero-area rectangle leaves no selection.
    ///
    /// Without an active drag the completed selection is kept as is.
    pub(crate) fn finish(&mut self) -> Option<Rectangle> {
        if self.anchor.take().is_none() {
            return self.completed;
        }
        self.completed = self.current.take().filter(|rect| !is_empty(rect));
        self.completed
    }

    pub(crate) fn set(&mut self, rect: Rectangle, bounds: Option<Size>) {
        let rect = match bounds {
            Some(bounds) => clamp_to_bounds(rect, bounds),
            None => rect,
        };
        self.anchor = None;
        self.current = None;
        self.completed = (!is_empty(&rect)).then_some(rect);
    }

    /// Changes the ratio and refits a completed selection from its origin.
    pub(crate) fn set_ratio(&mut self, ratio: CropRatio, bounds: Option<Size>) {
        self.ratio = ratio;
        if let (Some(rect), Some(bounds)) = (self.completed, bounds) {
            let corner = Point::new(rect.x + rect.width, rect.y + rect.height);
            let refit = constrained(rect.position(), clamp_point(corner, bounds), ratio);
            self.completed = (!is_empty(&refit)).then_some(refit);
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.anchor = None;
        self.current = None;
        self.completed = None;
    }
}

fn clamp_point(point: Point, bounds: Size) -> Point {
    let axis = |v: f32, max: f32| {
        if v.is_finite() {
            v.clamp(0.0, max.max(0.0))
        } else {
            0.0
        }
    };
    Point::new(axis(point.x, bounds.width), axis(point.y, bounds.height))
}

/// Largest rectangle with the requested aspect that fits between `anchor`
/// and `cursor`, growing in the drag direction.
fn constrained(anchor: Point, cursor: Point, ratio: CropRatio) -> Rectangle {
    let (dx, dy) = (cursor.x - anchor.x, cursor.y - anchor.y);
    let (mut width, mut height) = (dx.abs(), dy.abs());
    if let Some(aspect) = ratio.aspect() {
        width = width.min(height * aspect);
        height = width / aspect;
    }
    let x = if dx < 0.0 { anchor.x - width } else { anchor.x };
    let y = if dy < 0.0 { anchor.y - height } else { anchor.y };
    Rectangle {
        x,
        y,
        width,
        height,
    }
}

fn is_empty(rect: &Rectangle) -> bool {
    !(rect.width > 0.0 && rect.height > 0.0)
}

impl Session {
    /// Starts a drag selection (crop tool only).
    pub fn begin_crop(&mut self, point: Point) {
        if self.active_tool != EditorTool::Crop || self.is_submitting() {
            return;
        }
        if let Some(bounds) = self.layout {
            self.selection.crop.begin(point, bounds);
        }
    }

    pub fn update_crop(&mut self, point: Point) {
        if let Some(bounds) = self.layout {
            self.selection.crop.update(point, bounds);
        }
    }

    /// Ends the drag and returns the completed selection, if non-empty.
    pub fn finish_crop(&mut self) -> Option<Rectangle> {
        self.selection.crop.finish()
    }

    /// Sets the completed selection directly, clamped to the layout when known.
    pub fn set_crop_selection(&mut self, rect: Rectangle) {
        self.selection.crop.set(rect, self.layout);
    }

    pub fn set_crop_ratio(&mut self, ratio: CropRatio) {
        self.selection.crop.set_ratio(ratio, self.layout);
    }

    /// Rasterizes the completed selection and commits it as a new snapshot.
    ///
    /// # Errors
    ///
    /// - [`EditError::Busy`] while a submission is in flight.
    /// - [`EditError::NoImage`] or [`EditError::NoCropSelection`] when there
    ///   is nothing to crop.
    /// - [`EditError::ProcessingUnavailable`] when layout is unknown or the
    ///   rasterizer fails.
    ///
    /// Every error except `Busy` is also stored in the error slot.
    pub fn apply_crop(&mut self) -> Result<SnapshotId, EditError> {
        self.ensure_idle()?;
        let started = Instant::now();
        match self.rasterize_selection() {
            Ok(buffer) => {
                let (id, (width, height)) = (buffer.id(), buffer.dimensions());
                self.append(buffer);
                self.error = None;
                self.log_action(UserAction::ApplyCrop);
                if let Some(diagnostics) = &self.diagnostics {
                    diagnostics.log_operation(AppOperation::Crop {
                        width,
                        height,
                        duration_ms: elapsed_ms(started.elapsed()),
                    });
                }
                Ok(id)
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    fn rasterize_selection(&self) -> Result<ImageBuffer, EditError> {
        let source = self.history.current().ok_or(EditError::NoImage)?;
        let selection = self
            .selection
            .crop
            .completed()
            .ok_or(EditError::NoCropSelection)?;
        let rendered = self
            .layout
            .ok_or_else(|| EditError::ProcessingUnavailable("image has no layout yet".into()))?;
        self.rasterizer.rasterize(
            source,
            &CropRequest {
                selection,
                rendered,
                density: self.density,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    const BOUNDS: Size = Size::new(400.0, 300.0);

    #[test]
    fn free_drag_follows_the_cursor_in_any_direction() {
        let mut crop = CropState::default();
        crop.begin(Point::new(100.0, 100.0), BOUNDS);
        crop.update(Point::new(40.0, 160.0), BOUNDS);
        assert_eq!(
            crop.finish(),
            Some(Rectangle {
                x: 40.0,
                y: 100.0,
                width: 60.0,
                height: 60.0
            })
        );
        assert!(!crop.is_dragging());
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let mut crop = CropState::default();
        crop.begin(Point::new(350.0, 250.0), BOUNDS);
        crop.update(Point::new(900.0, 900.0), BOUNDS);
        let rect = crop.finish().expect("selection");
        assert_abs_diff_eq!(rect.x + rect.width, 400.0);
        assert_abs_diff_eq!(rect.y + rect.height, 300.0);
    }

    #[test]
    fn ratios_constrain_the_drag() {
        let mut crop = CropState::default();
        crop.set_ratio(CropRatio::Landscape, None);
        crop.begin(Point::ORIGIN, BOUNDS);
        crop.update(Point::new(320.0, 90.0), BOUNDS);
        let rect = crop.finish().expect("selection");
        assert_abs_diff_eq!(rect.width, 160.0, epsilon = 1e-3);
        assert_abs_diff_eq!(rect.height, 90.0, epsilon = 1e-3);

        crop.set_ratio(CropRatio::Square, Some(BOUNDS));
        let refit = crop.completed().expect("refit");
        assert_abs_diff_eq!(refit.width, refit.height);
    }

    #[test]
    fn click_without_drag_leaves_no_selection() {
        let mut crop = CropState::default();
        crop.begin(Point::new(10.0, 10.0), BOUNDS);
        assert_eq!(crop.finish(), None);
        assert!(!crop.has_selection());
    }

    #[test]
    fn release_without_drag_keeps_completed_selection() {
        let mut crop = CropState::default();
        let rect = Rectangle::new(Point::new(50.0, 50.0), Size::new(100.0, 80.0));
        crop.set(rect, Some(BOUNDS));

        assert_eq!(crop.finish(), Some(rect));
        assert_eq!(crop.completed(), Some(rect));
    }

    #[test]
    fn set_clamps_and_rejects_empty_rectangles() {
        let mut crop = CropState::default();
        crop.set(
            Rectangle {
                x: 380.0,
                y: 10.0,
                width: 50.0,
                height: 20.0,
            },
            Some(BOUNDS),
        );
        assert_eq!(crop.completed().map(|r| r.width), Some(20.0));

        crop.set(
            Rectangle {
                x: 10.0,
                y: 10.0,
                width: 0.0,
                height: 20.0,
            },
            Some(BOUNDS),
        );
        assert_eq!(crop.completed(), None);
    }

    #[test]
    fn ratio_aspects() {
        assert_eq!(CropRatio::Free.aspect(), None);
        assert_eq!(CropRatio::Square.aspect(), Some(1.0));
        assert_eq!(CropRatio::Photo.aspect(), Some(4.0 / 3.0));
    }
}
