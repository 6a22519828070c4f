// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core editing rules with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`conversation`]: Analysis conversation log ([`ConversationLog`](conversation::ConversationLog))
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`editing`]: Editing types ([`DevicePixelRatio`](editing::DevicePixelRatio),
//!   [`BrushRadius`](editing::BrushRadius), [`EditKind`](editing::EditKind))
//! - [`error`]: Domain error types ([`EditError`](error::EditError))

pub mod conversation;
pub mod diagnostics;
pub mod editing;
pub mod error;
