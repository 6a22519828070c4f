// SPDX-License-Identifier: MPL-2.0
//! Editing session: history, selection, conversation and submissions.
//!
//! A [`Session`] is the single context object for one edited image. It owns
//! the snapshot history, the transient selection (hotspot, crop rectangle,
//! paint mask), the analysis conversation, the single-flight submission state
//! and the display slots handing out renderer handles. `load` re-initializes
//! it; dropping it revokes every handle it issued.
//!
//! The host drives it in a "state down, messages up" fashion: widgets emit
//! [`Message`]s, [`Session::update`] applies them and returns an [`Event`]
//! when the host has work to do, such as running a [`PendingEdit`] against
//! the generative collaborator.

use crate::config::Config;
use crate::diagnostics::{DiagnosticsHandle, ErrorEvent, UserAction};
use crate::domain::conversation::ConversationLog;
use crate::domain::editing::{BrushRadius, DevicePixelRatio, EditorTool};
use crate::domain::error::EditError;
use crate::media::crop::CropRasterizer;
use crate::media::display::{DisplayHandle, DisplaySlot};
use crate::media::image_buffer::ImageBuffer;
use crate::media::mask::BrushMode;
use iced_core::Size;

mod messages;
mod state;

pub use messages::{CanvasMessage, Event, Message, SidebarMessage};
pub use state::{
    Completion, CropRatio, CropState, EditRequest, HistoryStack, Hotspot, Outcome, PendingEdit,
    Resolution, Selection, Ticket,
};

use state::Submission;

/// One editing session.
pub struct Session {
    /// Snapshot history with cursor.
    history: HistoryStack,
    /// Tool receiving canvas pointer input.
    active_tool: EditorTool,
    /// Hotspot, crop rectangle and mask; cleared whenever the snapshot changes.
    selection: Selection,
    brush_radius: BrushRadius,
    brush_mode: BrushMode,
    /// Size the current snapshot is laid out at, once known.
    layout: Option<Size>,
    /// Physical-to-logical pixel ratio of the rendering surface.
    density: DevicePixelRatio,
    conversation: ConversationLog,
    submission: Submission,
    /// Last failure, until dismissed or superseded by a success.
    error: Option<EditError>,
    rasterizer: CropRasterizer,
    current_slot: DisplaySlot,
    original_slot: DisplaySlot,
    diagnostics: Option<DiagnosticsHandle>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("active_tool", &self.active_tool)
            .field("layout", &self.layout)
            .field("submitting", &self.is_submitting())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates an empty session using the brush and crop settings of `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            history: HistoryStack::new(),
            active_tool: EditorTool::default(),
            selection: Selection::default(),
            brush_radius: config.brush_radius(),
            brush_mode: BrushMode::default(),
            layout: None,
            density: config.device_pixel_ratio(),
            conversation: ConversationLog::new(),
            submission: Submission::default(),
            error: None,
            rasterizer: CropRasterizer::new(config.crop.filter, config.max_output_dimension()),
            current_slot: DisplaySlot::new(),
            original_slot: DisplaySlot::new(),
            diagnostics: None,
        }
    }

    /// Attaches a diagnostics handle; actions and errors are logged to it.
    #[must_use]
    pub fn with_diagnostics(mut self, handle: DiagnosticsHandle) -> Self {
        self.diagnostics = Some(handle);
        self
    }

    /// Applies a message and reports what the host should do next.
    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::Sidebar(msg) => self.handle_sidebar_message(msg),
            Message::Canvas(msg) => self.handle_canvas_message(msg),
            Message::EditCompleted(completion) => {
                // Failures are already recorded in the error slot.
                let _ = self.complete(completion);
                Event::None
            }
        }
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Snapshot under the cursor; this is what a download saves.
    #[must_use]
    pub fn current(&self) -> Option<&ImageBuffer> {
        self.history.current()
    }

    #[must_use]
    pub fn original(&self) -> Option<&ImageBuffer> {
        self.history.original()
    }

    #[must_use]
    pub fn active_tool(&self) -> EditorTool {
        self.active_tool
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    #[must_use]
    pub fn brush_radius(&self) -> BrushRadius {
        self.brush_radius
    }

    #[must_use]
    pub fn brush_mode(&self) -> BrushMode {
        self.brush_mode
    }

    #[must_use]
    pub fn layout(&self) -> Option<Size> {
        self.layout
    }

    #[must_use]
    pub fn density(&self) -> DevicePixelRatio {
        self.density
    }

    /// The error awaiting dismissal, if any.
    #[must_use]
    pub fn error(&self) -> Option<&EditError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        if self.error.take().is_some() {
            self.log_action(UserAction::DismissError);
        }
    }

    /// Live renderer handle for the current snapshot.
    #[must_use]
    pub fn current_display_handle(&self) -> Option<DisplayHandle> {
        self.current_slot.active().cloned()
    }

    /// Live renderer handle for the original snapshot (before/after views).
    #[must_use]
    pub fn original_display_handle(&self) -> Option<DisplayHandle> {
        self.original_slot.active().cloned()
    }

    /// Points both display slots at the current history, revoking handles
    /// for snapshots that are no longer shown.
    fn sync_display(&mut self) {
        self.current_slot.sync(self.history.current());
        self.original_slot.sync(self.history.original());
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Stores `error` in the error slot and logs it.
    ///
    /// [`EditError::Busy`] only signals a disabled control and is returned
    /// without touching the slot.
    fn fail(&mut self, error: EditError) -> EditError {
        if error != EditError::Busy {
            if let Some(diagnostics) = &self.diagnostics {
                diagnostics.log_error(ErrorEvent::from(&error));
            }
            self.error = Some(error.clone());
        }
        error
    }

    fn log_action(&self, action: UserAction) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_action(action);
        }
    }
}
