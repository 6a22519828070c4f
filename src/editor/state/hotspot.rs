// SPDX-License-Identifier: MPL-2.0
//! Hotspot tracking for localized retouch.

use crate::diagnostics::UserAction;
use crate::domain::editing::EditorTool;
use crate::editor::Session;
use crate::media::coordinates::Scale;
use iced_core::{Point, Size};

/// A clicked point, kept in both spaces.
///
/// `rendered` positions the marker; `natural` is sent to the collaborator.
/// Both refer to the same pixel up to rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotspot {
    rendered: Point,
    natural: Point<u32>,
}

impl Hotspot {
    /// Maps a rendered-local click onto the natural grid.
    ///
    /// Returns `None` while layout is unavailable or when the click falls
    /// outside the rendered image.
    #[must_use]
    pub fn track(local: Point, rendered: Size, natural: Size<u32>) -> Option<Self> {
        let inside = (0.0..=rendered.width).contains(&local.x)
            && (0.0..=rendered.height).contains(&local.y);
        if !inside {
            return None;
        }
        let scale = Scale::between(rendered, natural)?;
        Some(Self {
            rendered: local,
            natural: scale.to_natural(local),
        })
    }

    #[must_use]
    pub fn rendered(&self) -> Point {
        self.rendered
    }

    #[must_use]
    pub fn natural(&self) -> Point<u32> {
        self.natural
    }

    /// Moves the marker for a new layout; the natural point is unchanged.
    pub(crate) fn relayout(&mut self, scale: &Scale) {
        self.rendered = scale.to_rendered(self.natural);
    }
}

impl Session {
    /// Handles a click on the image at rendered-local coordinates.
    ///
    /// Only the retouch tool records hotspots; other tools, clicks outside
    /// the image, clicks before layout and clicks while submitting are
    /// ignored and return `None`.
    pub fn click(&mut self, local: Point) -> Option<Hotspot> {
        if self.active_tool != EditorTool::Retouch || self.is_submitting() {
            return None;
        }
        let image = self.history.current()?;
        let rendered = self.layout?;
        let hotspot = Hotspot::track(local, rendered, Size::new(image.width(), image.height()))?;
        self.selection.hotspot = Some(hotspot);
        self.log_action(UserAction::PlaceHotspot {
            x: hotspot.natural.x,
            y: hotspot.natural.y,
        });
        Some(hotspot)
    }
}
