// SPDX-License-Identifier: MPL-2.0
//! Conversation log exchanged with the analysis collaborator.
//!
//! The log is append-only with one exception: when a model turn fails, the
//! user turn that triggered it is retracted so the question can be asked
//! again without being duplicated.

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// One piece of content inside a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Inline image, already base64-encoded.
    InlineImage { mime: String, data: String },
}

/// A single turn: an author and at least one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    segments: Vec<Segment>,
}

impl Turn {
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Concatenated text segments, ignoring images.
    #[must_use]
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(text.as_str()),
                Segment::InlineImage { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ordered conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user turn. Empty segment lists are ignored and return `false`.
    pub fn push_user(&mut self, segments: Vec<Segment>) -> bool {
        self.push(Role::User, segments)
    }

    /// Appends a model turn carrying a single text segment.
    pub fn push_model(&mut self, text: impl Into<String>) -> bool {
        self.push(Role::Model, vec![Segment::Text(text.into())])
    }

    fn push(&mut self, role: Role, segments: Vec<Segment>) -> bool {
        if segments.is_empty() {
            return false;
        }
        self.turns.push(Turn { role, segments });
        true
    }

    /// Removes the last turn if, and only if, it was authored by the user.
    ///
    /// Returns the retracted turn.
    pub fn retract_pending_user_turn(&mut self) -> Option<Turn> {
        match self.turns.last() {
            Some(turn) if turn.role == Role::User => self.turns.pop(),
            _ => None,
        }
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Vec<Segment> {
        vec![Segment::Text(value.to_string())]
    }

    #[test]
    fn turns_keep_insertion_order() {
        let mut log = ConversationLog::new();
        assert!(log.push_user(text("what is in this picture?")));
        assert!(log.push_model("a lighthouse"));

        let roles: Vec<_> = log.turns().iter().map(Turn::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model]);
        assert_eq!(log.last().map(Turn::text), Some("a lighthouse".to_string()));
    }

    #[test]
    fn empty_turns_are_rejected() {
        let mut log = ConversationLog::new();
        assert!(!log.push_user(Vec::new()));
        assert!(log.is_empty());
    }

    #[test]
    fn retract_only_removes_trailing_user_turn() {
        let mut log = ConversationLog::new();
        log.push_user(text("first"));
        log.push_model("answer");

        assert!(log.retract_pending_user_turn().is_none());
        assert_eq!(log.len(), 2);

        log.push_user(text("second"));
        let retracted = log.retract_pending_user_turn().expect("user turn");
        assert_eq!(retracted.text(), "second");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn text_skips_inline_images() {
        let mut log = ConversationLog::new();
        log.push_user(vec![
            Segment::InlineImage {
                mime: "image/png".into(),
                data: "iVBORw0KGgo=".into(),
            },
            Segment::Text("describe it".into()),
        ]);
        assert_eq!(log.turns()[0].text(), "describe it");
        assert_eq!(log.turns()[0].segments().len(), 2);
    }
}
