// SPDX-License-Identifier: MPL-2.0
//! Transient selection state and its maintenance when layout changes.

use crate::domain::editing::DevicePixelRatio;
use crate::editor::state::{CropState, Hotspot};
use crate::editor::Session;
use crate::media::coordinates::Scale;
use crate::media::mask::PaintMask;
use iced_core::{Point, Size};

/// Everything the user has pointed at on the current snapshot.
///
/// None of it survives a change of snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub(crate) crop: CropState,
    pub(crate) hotspot: Option<Hotspot>,
    pub(crate) mask: Option<PaintMask>,
    /// Last brush position while a stroke is in progress.
    pub(crate) stroke: Option<Point>,
}

impl Selection {
    #[must_use]
    pub fn crop(&self) -> &CropState {
        &self.crop
    }

    #[must_use]
    pub fn hotspot(&self) -> Option<&Hotspot> {
        self.hotspot.as_ref()
    }

    #[must_use]
    pub fn mask(&self) -> Option<&PaintMask> {
        self.mask.as_ref()
    }

    /// True when no hotspot, crop rectangle or painted pixel remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hotspot.is_none()
            && !self.crop.has_selection()
            && self.mask.as_ref().is_none_or(PaintMask::is_empty)
    }

    /// Drops hotspot, crop rectangle and mask. The crop ratio is a tool
    /// setting and is kept.
    pub fn clear(&mut self) {
        self.crop.clear_selection();
        self.hotspot = None;
        self.mask = None;
        self.stroke = None;
    }
}

impl Session {
    /// Records the size the current snapshot is laid out at and the
    /// surface density.
    ///
    /// Rendered-space selection that no longer fits is dropped: the crop
    /// rectangle always, the mask when its size changes. The hotspot keeps
    /// its natural point and has its marker moved to the new layout.
    pub fn set_layout(&mut self, rendered: Size, density: f32) {
        self.density = DevicePixelRatio::new(density);
        if self.layout == Some(rendered) {
            return;
        }
        self.layout = Some(rendered);
        self.selection.crop.clear_selection();
        self.selection.stroke = None;

        if let Some(mask) = &self.selection.mask {
            let fits = PaintMask::new(rendered).is_some_and(|fresh| fresh.size() == mask.size());
            if !fits {
                self.selection.mask = None;
            }
        }

        let scale = self
            .history
            .current()
            .and_then(|image| Scale::between(rendered, Size::new(image.width(), image.height())));
        match (scale, self.selection.hotspot.as_mut()) {
            (Some(scale), Some(hotspot)) => hotspot.relayout(&scale),
            (None, Some(_)) => self.selection.hotspot = None,
            _ => {}
        }
    }
}
