// SPDX-License-Identifier: MPL-2.0
//! Mask painting for the fill tool.

use crate::domain::editing::{BrushRadius, EditorTool};
use crate::editor::Session;
use crate::media::mask::{BrushMode, PaintMask};
use iced_core::Point;

impl Session {
    /// Starts a stroke at `point` (fill tool only).
    ///
    /// The mask is created on first use at the current layout size.
    pub fn press_brush(&mut self, point: Point) {
        if self.active_tool != EditorTool::Fill || self.is_submitting() {
            return;
        }
        if self.history.current().is_none() {
            return;
        }
        if self.selection.mask.is_none() {
            self.selection.mask = self.layout.and_then(PaintMask::new);
        }
        let (radius, mode) = (self.brush_radius, self.brush_mode);
        if let Some(mask) = self.selection.mask.as_mut() {
            mask.stamp(point, radius, mode);
            self.selection.stroke = Some(point);
        }
    }

    /// Continues the stroke started by [`Self::press_brush`].
    pub fn move_brush(&mut self, point: Point) {
        let Some(from) = self.selection.stroke else {
            return;
        };
        let (radius, mode) = (self.brush_radius, self.brush_mode);
        if let Some(mask) = self.selection.mask.as_mut() {
            mask.stroke(from, point, radius, mode);
            self.selection.stroke = Some(point);
        }
    }

    pub fn release_brush(&mut self) {
        self.selection.stroke = None;
    }

    pub fn set_brush_radius(&mut self, radius: u32) {
        self.brush_radius = BrushRadius::new(radius);
    }

    pub fn set_brush_mode(&mut self, mode: BrushMode) {
        self.brush_mode = mode;
    }

    /// Wipes the mask without leaving the fill tool.
    pub fn clear_mask(&mut self) {
        if let Some(mask) = self.selection.mask.as_mut() {
            mask.clear();
        }
        self.selection.stroke = None;
    }
}
