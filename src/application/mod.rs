// SPDX-License-Identifier: MPL-2.0
//! Application layer: ports the editing core depends on.
//!
//! - [`port`]: trait definitions implemented outside this crate
//!
//! # Dependency Rule
//!
//! - The application layer uses domain and media types only
//! - Network or model adapters implement the ports
//! - The editor session calls the ports through trait objects

pub mod port;
