// SPDX-License-Identifier: MPL-2.0
//! Snapshot history (undo/redo/reset) and the session operations built on it.

use crate::diagnostics::UserAction;
use crate::domain::error::EditError;
use crate::editor::Session;
use crate::media::image_buffer::ImageBuffer;

/// Linear snapshot history with a cursor.
///
/// The cursor is `None` exactly when the stack is empty. Appending after an
/// undo discards every snapshot past the cursor; there is no branching.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    snapshots: Vec<ImageBuffer>,
    cursor: Option<usize>,
}

impl HistoryStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole stack with a single snapshot.
    pub fn load(&mut self, buffer: ImageBuffer) {
        self.replace_all(vec![buffer], 0);
    }

    /// Replaces the content and cursor at once.
    ///
    /// The cursor is clamped to the new length; an empty `snapshots` leaves
    /// the stack empty.
    pub fn replace_all(&mut self, snapshots: Vec<ImageBuffer>, cursor: usize) {
        self.cursor = snapshots.len().checked_sub(1).map(|last| cursor.min(last));
        self.snapshots = snapshots;
    }

    /// Truncates past the cursor, pushes `buffer` and moves onto it.
    ///
    /// Returns `false` (and does nothing) on an empty stack.
    pub fn append(&mut self, buffer: ImageBuffer) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        self.snapshots.truncate(cursor + 1);
        self.snapshots.push(buffer);
        self.cursor = Some(self.snapshots.len() - 1);
        true
    }

    /// Steps back one snapshot. Returns `false` when already at the first.
    pub fn undo(&mut self) -> bool {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                true
            }
            _ => false,
        }
    }

    /// Steps forward one snapshot. Returns `false` when already at the last.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor = self.cursor.map(|cursor| cursor + 1);
        true
    }

    /// Moves back to the original without discarding anything.
    ///
    /// Returns `false` on an empty stack.
    pub fn reset(&mut self) -> bool {
        if self.cursor.is_none() {
            return false;
        }
        self.cursor = Some(0);
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|cursor| cursor + 1 < self.snapshots.len())
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The first snapshot, as loaded.
    #[must_use]
    pub fn original(&self) -> Option<&ImageBuffer> {
        self.snapshots.first()
    }

    /// The snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&ImageBuffer> {
        self.cursor.and_then(|cursor| self.snapshots.get(cursor))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &ImageBuffer> {
        self.snapshots.iter()
    }
}

impl Session {
    /// Starts a fresh editing session on `buffer`.
    ///
    /// Clears selection, conversation and any error, abandons an in-flight
    /// submission (its completion will be discarded) and revokes display
    /// handles issued for the previous content.
    pub fn load(&mut self, buffer: ImageBuffer) {
        self.log_action(UserAction::LoadImage {
            source: Some(buffer.name().to_string()),
        });
        self.history.load(buffer);
        self.submission.abandon();
        self.conversation.clear();
        self.error = None;
        self.clear_selection();
        self.sync_display();
    }

    /// Commits a new snapshot on top of the cursor.
    ///
    /// Returns `false` when no image is loaded.
    pub(crate) fn append(&mut self, buffer: ImageBuffer) -> bool {
        if !self.history.append(buffer) {
            return false;
        }
        self.clear_selection();
        self.sync_display();
        true
    }

    /// Whether undo is currently possible (never while submitting).
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.is_submitting() && self.history.can_undo()
    }

    /// Whether redo is currently possible (never while submitting).
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.is_submitting() && self.history.can_redo()
    }

    /// Steps back one snapshot.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Busy`] while a submission is in flight.
    pub fn undo(&mut self) -> Result<bool, EditError> {
        self.ensure_idle()?;
        let moved = self.history.undo();
        if moved {
            self.log_action(UserAction::Undo);
            self.after_cursor_move();
        }
        Ok(moved)
    }

    /// Steps forward one snapshot.
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Busy`] while a submission is in flight.
    pub fn redo(&mut self) -> Result<bool, EditError> {
        self.ensure_idle()?;
        let moved = self.history.redo();
        if moved {
            self.log_action(UserAction::Redo);
            self.after_cursor_move();
        }
        Ok(moved)
    }

    /// Returns to the original snapshot, keeping later ones for redo.
    ///
    /// Returns `Ok(false)` when no image is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Busy`] while a submission is in flight.
    pub fn reset(&mut self) -> Result<bool, EditError> {
        self.ensure_idle()?;
        let moved = self.history.reset();
        if moved {
            self.log_action(UserAction::ResetToOriginal);
            self.after_cursor_move();
        }
        Ok(moved)
    }

    fn after_cursor_move(&mut self) {
        self.clear_selection();
        self.sync_display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{DynamicImage, RgbaImage};

    fn snapshot() -> ImageBuffer {
        ImageBuffer::from_dynamic_png(&DynamicImage::ImageRgba8(RgbaImage::new(1, 1)), "test")
            .expect("png")
    }

    fn stack_of(count: usize) -> (HistoryStack, Vec<ImageBuffer>) {
        let buffers: Vec<_> = (0..count).map(|_| snapshot()).collect();
        let mut stack = HistoryStack::new();
        stack.load(buffers[0].clone());
        for buffer in &buffers[1..] {
            assert!(stack.append(buffer.clone()));
        }
        (stack, buffers)
    }

    fn contents(stack: &HistoryStack) -> Vec<ImageBuffer> {
        stack.snapshots().cloned().collect()
    }

    #[test]
    fn empty_stack_ignores_every_mutation() {
        let mut stack = HistoryStack::new();
        assert!(!stack.append(snapshot()));
        assert!(!stack.undo());
        assert!(!stack.redo());
        assert!(!stack.reset());
        assert_eq!(stack.cursor(), None);
        assert!(stack.is_empty());
        assert!(stack.current().is_none());
        assert!(stack.original().is_none());
    }

    #[test]
    fn load_replaces_everything() {
        let (mut stack, _) = stack_of(3);
        let fresh = snapshot();
        stack.load(fresh.clone());
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.cursor(), Some(0));
        assert_eq!(stack.current(), Some(&fresh));
        assert_eq!(stack.original(), Some(&fresh));
    }

    #[test]
    fn append_after_undo_truncates_redo_branch() {
        let (mut stack, buffers) = stack_of(3);
        assert_eq!(stack.cursor(), Some(2));

        assert!(stack.undo());
        assert!(stack.undo());
        let d = snapshot();
        assert!(stack.append(d.clone()));

        assert_eq!(contents(&stack), vec![buffers[0].clone(), d]);
        assert_eq!(stack.cursor(), Some(1));
        assert!(!stack.can_redo());
        assert!(!stack.redo());
    }

    #[test]
    fn undo_and_redo_stop_at_the_bounds() {
        let (mut stack, _) = stack_of(2);
        assert!(!stack.redo());
        assert!(stack.undo());
        assert!(!stack.undo());
        assert_eq!(stack.cursor(), Some(0));
        assert!(stack.redo());
        assert!(!stack.redo());
        assert_eq!(stack.cursor(), Some(1));
    }

    #[test]
    fn reset_keeps_length_and_allows_redo() {
        let (mut stack, buffers) = stack_of(3);
        assert!(stack.undo());
        assert!(stack.reset());
        assert_eq!(stack.cursor(), Some(0));
        assert_eq!(stack.len(), 3);
        assert!(stack.redo());
        assert_eq!(stack.current(), Some(&buffers[1]));
    }

    #[test]
    fn cursor_always_points_at_current() {
        // Pseudo-random interleaving of appends, undos and redos.
        let mut stack = HistoryStack::new();
        stack.load(snapshot());
        let mut seed = 0x2545_f491_u32;
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            match seed % 4 {
                0 | 1 => {
                    stack.append(snapshot());
                }
                2 => {
                    stack.undo();
                }
                _ => {
                    stack.redo();
                }
            }
            let cursor = stack.cursor().expect("loaded");
            assert!(cursor < stack.len());
            assert_eq!(stack.current(), stack.snapshots().nth(cursor));
            assert_eq!(stack.can_undo(), cursor > 0);
            assert_eq!(stack.can_redo(), cursor + 1 < stack.len());
        }
    }

    #[test]
    fn replace_all_clamps_cursor() {
        let mut stack = HistoryStack::new();
        stack.replace_all(vec![snapshot(), snapshot()], 9);
        assert_eq!(stack.cursor(), Some(1));
        stack.replace_all(Vec::new(), 0);
        assert_eq!(stack.cursor(), None);
    }
}
