// SPDX-License-Identifier: MPL-2.0
//! Session sub-state modules (history, selection, crop, submissions, ...).

mod brush;
pub mod crop;
pub mod history;
pub mod hotspot;
mod routing;
pub mod selection;
pub mod submission;
mod tools;

pub use crop::{CropRatio, CropState};
pub use history::HistoryStack;
pub use hotspot::Hotspot;
pub use selection::Selection;
pub use submission::{Completion, EditRequest, Outcome, PendingEdit, Resolution, Ticket};

pub(crate) use submission::Submission;

use std::time::Duration;

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
pub(crate) fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
