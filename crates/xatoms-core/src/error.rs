//! Error types for the atom listing pipeline.
//!
//! This module defines the central `Error` enum covering every condition that
//! ends a run. Routine outcomes of a scan (an atom without a name, a name that
//! fails the match filter) are not errors; they are counted in
//! [`ScanReport`](crate::ScanReport) instead.
//!
//! ## Error Cases
//! - `InvalidRange` / `InvalidConfig`: bad user input, detected before any
//!   connection is opened.
//! - `Connect`: the display server could not be reached.
//! - `Protocol`: a request could not be issued or its reply was unusable.
//! - `NameOverflow`: a reply carried a name longer than the configured limit.
//! - `Output`: writing rendered records failed.

use crate::atom::AtomId;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for xatoms.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A range argument could not be parsed.
    #[error("Invalid range `{input}`: {reason}")]
    InvalidRange { input: String, reason: String },

    /// A configuration value is outside its allowed bounds.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The display server could not be reached or refused the connection.
    #[error("Display connection error: {context}")]
    Connect { context: String },

    /// The connection broke or returned an unusable reply while resolving
    /// `atom`.
    #[error("Protocol error at atom {atom}: {context}")]
    Protocol { atom: AtomId, context: String },

    /// The name returned for `atom` does not fit the name buffer limit.
    #[error("Atom name buffer overflow: atom {atom} has a {len} byte name (limit {max})")]
    NameOverflow { atom: AtomId, len: usize, max: usize },

    /// Rendered output could not be written.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}
