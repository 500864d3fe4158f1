//! Client-side components of the `xatoms` binary.
//!
//! ## Submodules
//!
//! - [`config`] - Command line parsing and validation into a [`RunConfig`].
//! - [`display`] - The X11 connection, exposed to the scan as an
//!   [`AtomSource`](xatoms_core::AtomSource).
//! - [`telemetry`] - Structured logging to stderr.
//!
//! [`RunConfig`]: config::RunConfig

pub mod config;
pub mod display;
pub mod telemetry;
