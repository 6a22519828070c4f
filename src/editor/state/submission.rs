// SPDX-License-Identifier: MPL-2.0
//! Single-flight submissions to the generative collaborator.
//!
//! A submission runs in three steps so the host can drive the asynchronous
//! part on its own executor:
//!
//! 1. [`Session::begin`] validates preconditions, captures everything the
//!    collaborator needs and marks the session as submitting.
//! 2. [`PendingEdit::run`] awaits the collaborator without touching the
//!    session.
//! 3. [`Session::complete`] applies the [`Completion`]: a new snapshot, a
//!    model answer or an error.
//!
//! Every submission carries a [`Ticket`]. A completion whose ticket is not
//! the one in flight (because the session was reloaded meanwhile) is
//! discarded without side effects.

use std::time::{Duration, Instant};

use super::elapsed_ms;

use crate::application::port::GenerativeEditor;
use crate::diagnostics::{AppOperation, UserAction};
use crate::domain::conversation::{ConversationLog, Segment};
use crate::domain::editing::{EditKind, Requirement};
use crate::domain::error::EditError;
use crate::editor::Session;
use crate::media::image_buffer::{ImageBuffer, SnapshotId};
use crate::media::mask::PaintMask;
use iced_core::{Point, Size};

/// A request from the editing panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRequest {
    /// Localized edit around the committed hotspot.
    Retouch { prompt: String },
    /// Regenerate the painted mask area.
    MagicFill { prompt: String },
    /// Restyle the whole image.
    Style { prompt: String },
    /// Global tonal or color adjustment.
    Adjust { prompt: String },
    /// Ask a question about the image.
    Analyze { prompt: String },
}

impl EditRequest {
    #[must_use]
    pub fn kind(&self) -> EditKind {
        match self {
            EditRequest::Retouch { .. } => EditKind::Retouch,
            EditRequest::MagicFill { .. } => EditKind::MagicFill,
            EditRequest::Style { .. } => EditKind::Style,
            EditRequest::Adjust { .. } => EditKind::Adjust,
            EditRequest::Analyze { .. } => EditKind::Analyze,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            EditRequest::Retouch { prompt }
            | EditRequest::MagicFill { prompt }
            | EditRequest::Style { prompt }
            | EditRequest::Adjust { prompt }
            | EditRequest::Analyze { prompt } => prompt,
        }
    }
}

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Single-flight bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct Submission {
    next_ticket: u64,
    in_flight: Option<(Ticket, EditKind)>,
}

impl Submission {
    pub(crate) fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub(crate) fn in_flight(&self) -> Option<(Ticket, EditKind)> {
        self.in_flight
    }

    fn start(&mut self, kind: EditKind) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.in_flight = Some((ticket, kind));
        ticket
    }

    /// Forgets the in-flight submission; its completion will be discarded.
    pub(crate) fn abandon(&mut self) {
        self.in_flight = None;
    }

    /// Ends the submission holding `ticket`. Returns `false` when stale.
    fn finish(&mut self, ticket: Ticket) -> bool {
        match self.in_flight {
            Some((current, _)) if current == ticket => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }
}

/// Owned inputs for one collaborator call.
#[derive(Debug, Clone)]
enum Job {
    Retouch {
        image: ImageBuffer,
        prompt: String,
        hotspot: Point<u32>,
    },
    MagicFill {
        image: ImageBuffer,
        mask: ImageBuffer,
        prompt: String,
    },
    Style {
        image: ImageBuffer,
        prompt: String,
    },
    Adjust {
        image: ImageBuffer,
        prompt: String,
    },
    Analyze {
        log: ConversationLog,
    },
}

impl Job {
    async fn execute(
        &self,
        kind: EditKind,
        editor: &dyn GenerativeEditor,
    ) -> Result<Outcome, EditError> {
        let url = match self {
            Job::Retouch {
                image,
                prompt,
                hotspot,
            } => editor.edit_image(image, prompt, *hotspot).await?,
            Job::MagicFill {
                image,
                mask,
                prompt,
            } => editor.inpaint_image(image, mask, prompt).await?,
            Job::Style { image, prompt } => editor.style_image(image, prompt).await?,
            Job::Adjust { image, prompt } => editor.adjust_image(image, prompt).await?,
            Job::Analyze { log } => {
                let analysis = editor.analyze(log).await?;
                return analysis.into_text().map(Outcome::Answer);
            }
        };
        ImageBuffer::from_data_url(&url, kind.operation_name())
            .map(Outcome::Image)
            .map_err(|e| EditError::MalformedResult(e.to_string()))
    }
}

/// A validated submission waiting for its collaborator call.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    ticket: Ticket,
    kind: EditKind,
    job: Job,
}

impl PendingEdit {
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    #[must_use]
    pub fn kind(&self) -> EditKind {
        self.kind
    }

    /// Calls the collaborator and packages its result.
    ///
    /// Never fails: errors travel inside the [`Completion`] so that
    /// [`Session::complete`] can record them.
    pub async fn run(self, editor: &dyn GenerativeEditor) -> Completion {
        let started = Instant::now();
        let outcome = self.job.execute(self.kind, editor).await;
        Completion {
            ticket: self.ticket,
            kind: self.kind,
            outcome,
            elapsed: started.elapsed(),
        }
    }
}

/// What a successful collaborator call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Image(ImageBuffer),
    Answer(String),
}

/// Result of [`PendingEdit::run`], fed back through [`Session::complete`].
#[derive(Debug, Clone)]
pub struct Completion {
    ticket: Ticket,
    kind: EditKind,
    outcome: Result<Outcome, EditError>,
    elapsed: Duration,
}

impl Completion {
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    #[must_use]
    pub fn kind(&self) -> EditKind {
        self.kind
    }

    #[must_use]
    pub fn outcome(&self) -> &Result<Outcome, EditError> {
        &self.outcome
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// How a completion changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A new snapshot was appended and is now current.
    Appended(SnapshotId),
    /// A model turn was added to the conversation.
    Answered,
    /// The completion belonged to an abandoned submission and was ignored.
    Discarded,
}

impl Session {
    /// Whether a submission is awaiting its collaborator.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submission.is_submitting()
    }

    /// Ticket and kind of the submission in flight.
    #[must_use]
    pub fn in_flight(&self) -> Option<(Ticket, EditKind)> {
        self.submission.in_flight()
    }

    /// Fails with [`EditError::Busy`] while a submission is in flight.
    pub(crate) fn ensure_idle(&self) -> Result<(), EditError> {
        if self.is_submitting() {
            Err(EditError::Busy)
        } else {
            Ok(())
        }
    }

    /// Validates `request` and starts a submission.
    ///
    /// For analysis the user turn (image plus prompt) is appended to the
    /// conversation now, and retracted if the call fails.
    ///
    /// # Errors
    ///
    /// - [`EditError::Busy`] while another submission is in flight.
    /// - The first unmet requirement of the request's kind: [`EditError::NoImage`],
    ///   [`EditError::EmptyPrompt`], [`EditError::NoHotspot`] or [`EditError::NoMask`].
    /// - [`EditError::ProcessingUnavailable`] when the mask cannot be exported.
    ///
    /// Every error except `Busy` is also stored in the error slot.
    pub fn begin(&mut self, request: EditRequest) -> Result<PendingEdit, EditError> {
        self.ensure_idle()?;
        let kind = request.kind();
        let prompt_chars = request.prompt().chars().count();
        let job = match self.prepare(kind, request) {
            Ok(job) => job,
            Err(error) => return Err(self.fail(error)),
        };
        let ticket = self.submission.start(kind);
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_action_with_details(
                UserAction::SubmitEdit {
                    kind: kind.to_string(),
                },
                Some(format!("ticket #{}, {prompt_chars} prompt chars", ticket.value())),
            );
        }
        Ok(PendingEdit { ticket, kind, job })
    }

    fn check(&self, kind: EditKind, prompt: &str) -> Result<(), EditError> {
        for requirement in kind.requirements() {
            let met = match requirement {
                Requirement::Image => self.history.current().is_some(),
                Requirement::Prompt => !prompt.trim().is_empty(),
                Requirement::Hotspot => self.selection.hotspot.is_some(),
                Requirement::Mask => self
                    .selection
                    .mask
                    .as_ref()
                    .is_some_and(|mask| !mask.is_empty()),
            };
            if !met {
                return Err(match requirement {
                    Requirement::Image => EditError::NoImage,
                    Requirement::Prompt => EditError::EmptyPrompt,
                    Requirement::Hotspot => EditError::NoHotspot,
                    Requirement::Mask => EditError::NoMask,
                });
            }
        }
        Ok(())
    }

    fn prepare(&mut self, kind: EditKind, request: EditRequest) -> Result<Job, EditError> {
        self.check(kind, request.prompt())?;
        let image = self.history.current().cloned().ok_or(EditError::NoImage)?;

        let job = match request {
            EditRequest::Retouch { prompt } => {
                let hotspot = self.selection.hotspot.ok_or(EditError::NoHotspot)?;
                Job::Retouch {
                    image,
                    prompt,
                    hotspot: hotspot.natural(),
                }
            }
            EditRequest::MagicFill { prompt } => {
                let mask = self.selection.mask.as_ref().ok_or(EditError::NoMask)?;
                let mask = export_mask(mask, &image)?;
                Job::MagicFill {
                    image,
                    mask,
                    prompt,
                }
            }
            EditRequest::Style { prompt } => Job::Style { image, prompt },
            EditRequest::Adjust { prompt } => Job::Adjust { image, prompt },
            EditRequest::Analyze { prompt } => {
                self.conversation.push_user(vec![
                    Segment::InlineImage {
                        mime: image.mime().to_string(),
                        data: image.to_base64(),
                    },
                    Segment::Text(prompt),
                ]);
                Job::Analyze {
                    log: self.conversation.clone(),
                }
            }
        };
        Ok(job)
    }

    /// Applies the result of a collaborator call.
    ///
    /// # Errors
    ///
    /// Returns the collaborator failure carried by `completion`; it is also
    /// stored in the error slot. Stale completions never fail.
    pub fn complete(&mut self, completion: Completion) -> Result<Resolution, EditError> {
        let Completion {
            ticket,
            kind,
            outcome,
            elapsed,
        } = completion;

        if !self.submission.finish(ticket) {
            if let Some(diagnostics) = &self.diagnostics {
                diagnostics.log_warning(format!(
                    "discarded {kind} result for abandoned submission #{}",
                    ticket.value()
                ));
            }
            return Ok(Resolution::Discarded);
        }

        let resolution = match outcome {
            Ok(Outcome::Image(buffer)) => {
                let id = buffer.id();
                if !self.append(buffer) {
                    return Err(self.fail(EditError::NoImage));
                }
                Resolution::Appended(id)
            }
            Ok(Outcome::Answer(text)) => {
                self.conversation.push_model(text);
                Resolution::Answered
            }
            Err(error) => {
                if kind == EditKind::Analyze {
                    self.conversation.retract_pending_user_turn();
                }
                return Err(self.fail(error));
            }
        };

        self.error = None;
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_operation(AppOperation::Edit {
                kind: kind.to_string(),
                duration_ms: elapsed_ms(elapsed),
            });
        }
        Ok(resolution)
    }

    /// Runs a whole submission against `editor`: begin, call, complete.
    ///
    /// # Errors
    ///
    /// See [`Session::begin`] and [`Session::complete`].
    pub async fn submit(
        &mut self,
        request: EditRequest,
        editor: &dyn GenerativeEditor,
    ) -> Result<Resolution, EditError> {
        let pending = self.begin(request)?;
        let completion = pending.run(editor).await;
        self.complete(completion)
    }
}

/// Scales the painted mask onto the natural grid of `image`.
fn export_mask(mask: &PaintMask, image: &ImageBuffer) -> Result<ImageBuffer, EditError> {
    mask.to_image_buffer(Size::new(image.width(), image.height()))
        .map_err(|e| EditError::ProcessingUnavailable(e.to_string()))
}
