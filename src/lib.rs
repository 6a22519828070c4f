// SPDX-License-Identifier: MPL-2.0
//! `retouch_lens` is the editing core of an AI-assisted image editor.
//!
//! It keeps a non-destructive snapshot history with undo/redo, maps clicks
//! and selections from the rendered canvas to the image's natural pixel
//! grid, rasterizes crops at the output surface's pixel density and drives
//! single-flight submissions to a generative collaborator.
//!
//! The collaborator itself sits behind [`application::port::GenerativeEditor`];
//! rendering is left to the host, which receives revocable display handles.

#![doc(html_root_url = "https://docs.rs/retouch_lens/0.1.0")]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod editor;
pub mod error;
pub mod media;

#[cfg(test)]
mod test_utils;
