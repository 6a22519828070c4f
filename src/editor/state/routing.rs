// SPDX-License-Identifier: MPL-2.0
//! Message routing helpers that keep the session facade slim.

use crate::domain::editing::EditorTool;
use crate::editor::{CanvasMessage, Event, Session, SidebarMessage};
use iced_core::Point;

impl Session {
    // Undo/redo/reset/crop errors are recorded in the error slot by the
    // operations themselves; Busy only means the control was disabled.
    pub(crate) fn handle_sidebar_message(&mut self, message: SidebarMessage) -> Event {
        match message {
            SidebarMessage::SelectTool(tool) => {
                self.select_tool(tool);
                Event::None
            }
            SidebarMessage::SetCropRatio(ratio) => {
                self.set_crop_ratio(ratio);
                Event::None
            }
            SidebarMessage::ApplyCrop => {
                let _ = self.apply_crop();
                Event::None
            }
            SidebarMessage::SetBrushRadius(radius) => {
                self.set_brush_radius(radius);
                Event::None
            }
            SidebarMessage::SetBrushMode(mode) => {
                self.set_brush_mode(mode);
                Event::None
            }
            SidebarMessage::ClearMask => {
                self.clear_mask();
                Event::None
            }
            SidebarMessage::Submit(request) => match self.begin(request) {
                Ok(pending) => Event::Submit(pending),
                Err(_) => Event::None,
            },
            SidebarMessage::Undo => {
                let _ = self.undo();
                Event::None
            }
            SidebarMessage::Redo => {
                let _ = self.redo();
                Event::None
            }
            SidebarMessage::Reset => {
                let _ = self.reset();
                Event::None
            }
            SidebarMessage::DismissError => {
                self.dismiss_error();
                Event::None
            }
            SidebarMessage::Download => self
                .current()
                .cloned()
                .map_or(Event::None, Event::Download),
        }
    }

    pub(crate) fn handle_canvas_message(&mut self, message: CanvasMessage) -> Event {
        match message {
            CanvasMessage::LayoutChanged { rendered, density } => {
                self.set_layout(rendered, density);
            }
            CanvasMessage::PointerPressed { position } => self.pointer_pressed(position),
            CanvasMessage::PointerMoved { position } => self.pointer_moved(position),
            CanvasMessage::PointerReleased => self.pointer_released(),
        }
        Event::None
    }

    fn pointer_pressed(&mut self, position: Point) {
        match self.active_tool {
            EditorTool::Retouch => {
                self.click(position);
            }
            EditorTool::Crop => self.begin_crop(position),
            EditorTool::Fill => self.press_brush(position),
            EditorTool::Adjust | EditorTool::Style | EditorTool::Analyze => {}
        }
    }

    fn pointer_moved(&mut self, position: Point) {
        match self.active_tool {
            EditorTool::Crop => self.update_crop(position),
            EditorTool::Fill => self.move_brush(position),
            _ => {}
        }
    }

    fn pointer_released(&mut self) {
        match self.active_tool {
            EditorTool::Crop => {
                self.finish_crop();
            }
            EditorTool::Fill => self.release_brush(),
            _ => {}
        }
    }
}
