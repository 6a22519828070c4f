// SPDX-License-Identifier: MPL-2.0
//! Session message/event types re-exported by the facade.

use crate::domain::editing::EditorTool;
use crate::editor::state::{Completion, CropRatio, EditRequest, PendingEdit};
use crate::media::image_buffer::ImageBuffer;
use crate::media::mask::BrushMode;
use iced_core::{Point, Size};

/// Sidebar control messages.
#[derive(Debug, Clone)]
pub enum SidebarMessage {
    SelectTool(EditorTool),
    SetCropRatio(CropRatio),
    ApplyCrop,
    SetBrushRadius(u32),
    SetBrushMode(BrushMode),
    ClearMask,
    /// Send the prompt of the active panel.
    Submit(EditRequest),
    Undo,
    Redo,
    /// Jump back to the originally loaded image.
    Reset,
    DismissError,
    /// Save the current snapshot.
    Download,
}

/// Pointer and layout messages from the canvas, in rendered-local coordinates.
#[derive(Debug, Clone)]
pub enum CanvasMessage {
    /// The image was laid out at `rendered` on a surface of `density`.
    LayoutChanged { rendered: Size, density: f32 },
    PointerPressed { position: Point },
    PointerMoved { position: Point },
    PointerReleased,
}

/// Messages accepted by [`crate::editor::Session::update`].
#[derive(Debug, Clone)]
pub enum Message {
    Sidebar(SidebarMessage),
    Canvas(CanvasMessage),
    /// A [`PendingEdit`] finished running.
    EditCompleted(Completion),
}

impl From<SidebarMessage> for Message {
    fn from(message: SidebarMessage) -> Self {
        Message::Sidebar(message)
    }
}

impl From<CanvasMessage> for Message {
    fn from(message: CanvasMessage) -> Self {
        Message::Canvas(message)
    }
}

impl From<Completion> for Message {
    fn from(completion: Completion) -> Self {
        Message::EditCompleted(completion)
    }
}

/// Side effects the host must perform.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    /// Run this edit against the collaborator, then send back
    /// [`Message::EditCompleted`].
    Submit(PendingEdit),
    /// Save these bytes under their suggested name.
    Download(ImageBuffer),
}
