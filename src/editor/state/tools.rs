// SPDX-License-Identifier: MPL-2.0
//! Tool switching and per-tool teardown.

use crate::diagnostics::UserAction;
use crate::domain::editing::EditorTool;
use crate::editor::Session;

impl Session {
    /// Activates `tool`, tearing down the selection owned by the previous one.
    pub fn select_tool(&mut self, tool: EditorTool) {
        if self.active_tool == tool {
            return;
        }
        self.teardown_tool(self.active_tool);
        self.active_tool = tool;
        self.log_action(UserAction::SelectTool {
            tool: format!("{tool:?}").to_lowercase(),
        });
    }

    fn teardown_tool(&mut self, tool: EditorTool) {
        match tool {
            EditorTool::Retouch => self.selection.hotspot = None,
            EditorTool::Fill => {
                self.selection.mask = None;
                self.selection.stroke = None;
            }
            EditorTool::Crop => self.selection.crop.clear_selection(),
            EditorTool::Adjust | EditorTool::Style | EditorTool::Analyze => {}
        }
    }
}
