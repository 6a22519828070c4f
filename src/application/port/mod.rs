// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! # Available Ports
//!
//! - [`generation`]: generative image editing and image analysis
//!
//! # Design Notes
//!
//! - Collaborators are asynchronous and fallible; methods return boxed
//!   futures so the trait stays object safe
//! - Traits are `Send + Sync` so hosts can drive calls from any executor
//! - Image results are returned exactly as produced (data URLs); decoding
//!   and validation happen in the editor session

pub mod generation;

pub use generation::{Analysis, GenerationError, GenerativeEditor};
