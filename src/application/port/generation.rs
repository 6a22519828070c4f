// SPDX-License-Identifier: MPL-2.0
//! Generative editing port.
//!
//! This module defines the [`GenerativeEditor`] trait for the remote
//! collaborators that retouch, inpaint, restyle, adjust or describe an
//! image.

use crate::domain::conversation::ConversationLog;
use crate::domain::error::EditError;
use crate::media::image_buffer::ImageBuffer;
use futures_util::future::BoxFuture;
use iced_core::Point;
use std::fmt;

// =============================================================================
// GenerationError
// =============================================================================

/// Errors reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The request failed (network, quota, model error).
    Failed(String),

    /// The collaborator refused to produce content.
    Blocked(String),

    /// The collaborator answered without any image.
    NoImage,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Failed(msg) => write!(f, "Generation failed: {msg}"),
            GenerationError::Blocked(reason) => write!(f, "Request blocked: {reason}"),
            GenerationError::NoImage => write!(f, "The model did not return an image"),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<GenerationError> for EditError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::Failed(msg) => EditError::Generation(msg),
            GenerationError::Blocked(reason) => EditError::Blocked(reason),
            GenerationError::NoImage => EditError::MalformedResult(error.to_string()),
        }
    }
}

// =============================================================================
// Analysis
// =============================================================================

/// Text answer from the analysis collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analysis {
    pub text: String,
    /// Set when the collaborator withheld its answer.
    pub block_reason: Option<String>,
}

impl Analysis {
    #[must_use]
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            block_reason: None,
        }
    }

    #[must_use]
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            block_reason: Some(reason.into()),
        }
    }

    /// Converts a blocked analysis into an error.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Blocked`] when a block reason is present.
    pub fn into_text(self) -> Result<String, EditError> {
        match self.block_reason {
            Some(reason) => Err(EditError::Blocked(reason)),
            None => Ok(self.text),
        }
    }
}

// =============================================================================
// GenerativeEditor Trait
// =============================================================================

/// Port for the remote generative model.
///
/// Image-producing methods resolve to a `data:<mime>;base64,<payload>` URL.
/// Implementations must not assume any call is cancelled: every returned
/// future is polled to completion.
///
/// # Example
///
/// ```
/// use futures_util::future::{self, BoxFuture, FutureExt};
/// use iced_core::Point;
/// use retouch_lens::application::port::{Analysis, GenerationError, GenerativeEditor};
/// use retouch_lens::domain::conversation::ConversationLog;
/// use retouch_lens::media::ImageBuffer;
///
/// struct Offline;
///
/// impl GenerativeEditor for Offline {
///     fn edit_image<'a>(&'a self, _: &'a ImageBuffer, _: &'a str, _: Point<u32>)
///         -> BoxFuture<'a, Result<String, GenerationError>> {
///         future::ready(Err(GenerationError::Failed("offline".into()))).boxed()
///     }
///     fn inpaint_image<'a>(&'a self, _: &'a ImageBuffer, _: &'a ImageBuffer, _: &'a str)
///         -> BoxFuture<'a, Result<String, GenerationError>> {
///         future::ready(Err(GenerationError::Failed("offline".into()))).boxed()
///     }
///     fn style_image<'a>(&'a self, _: &'a ImageBuffer, _: &'a str)
///         -> BoxFuture<'a, Result<String, GenerationError>> {
///         future::ready(Err(GenerationError::Failed("offline".into()))).boxed()
///     }
///     fn adjust_image<'a>(&'a self, _: &'a ImageBuffer, _: &'a str)
///         -> BoxFuture<'a, Result<String, GenerationError>> {
///         future::ready(Err(GenerationError::Failed("offline".into()))).boxed()
///     }
///     fn analyze<'a>(&'a self, _: &'a ConversationLog)
///         -> BoxFuture<'a, Result<Analysis, GenerationError>> {
///         future::ready(Ok(Analysis::answer("a cat"))).boxed()
///     }
/// }
/// ```
pub trait GenerativeEditor: Send + Sync {
    /// Applies `prompt` around the natural-space `hotspot`.
    fn edit_image<'a>(
        &'a self,
        image: &'a ImageBuffer,
        prompt: &'a str,
        hotspot: Point<u32>,
    ) -> BoxFuture<'a, Result<String, GenerationError>>;

    /// Regenerates the white area of `mask` (same natural size as `image`).
    fn inpaint_image<'a>(
        &'a self,
        image: &'a ImageBuffer,
        mask: &'a ImageBuffer,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerationError>>;

    /// Restyles the whole image.
    fn style_image<'a>(
        &'a self,
        image: &'a ImageBuffer,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerationError>>;

    /// Applies a global tonal or color adjustment.
    fn adjust_image<'a>(
        &'a self,
        image: &'a ImageBuffer,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerationError>>;

    /// Answers the last user turn of `log`.
    fn analyze<'a>(
        &'a self,
        log: &'a ConversationLog,
    ) -> BoxFuture<'a, Result<Analysis, GenerationError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_errors_map_onto_edit_errors() {
        assert_eq!(
            EditError::from(GenerationError::Failed("quota".into())),
            EditError::Generation("quota".into())
        );
        assert_eq!(
            EditError::from(GenerationError::Blocked("SAFETY".into())),
            EditError::Blocked("SAFETY".into())
        );
        assert!(matches!(
            EditError::from(GenerationError::NoImage),
            EditError::MalformedResult(_)
        ));
    }

    #[test]
    fn blocked_analysis_is_an_error() {
        assert_eq!(
            Analysis::blocked("OTHER").into_text(),
            Err(EditError::Blocked("OTHER".into()))
        );
        assert_eq!(Analysis::answer("a dog").into_text(), Ok("a dog".into()));
    }
}
