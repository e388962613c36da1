//! Error types for the StudioSync core library.
//!
//! The conflict engine keeps two error lanes. [`ConflictError`] is the
//! internal type a detector or resolver returns when its algorithm fails;
//! the [`ConflictManager`](crate::manager::ConflictManager) converts it at
//! the API boundary -- into a log line during detection, into a failed
//! [`ResolutionResult`](crate::models::ResolutionResult) during resolution.
//! No error crosses the public API as a panic or a bare `Err`.

use thiserror::Error;

/// Errors from the conflict detection / resolution subsystem.
#[derive(Debug, Error)]
pub enum ConflictError {
    /// A detector's rule failed while examining a change pair.
    #[error("detector '{name}' failed: {detail}")]
    DetectorFailed { name: String, detail: String },

    /// A resolver's algorithm failed while producing merged output.
    #[error("resolver '{name}' failed: {detail}")]
    ResolverFailed { name: String, detail: String },

    /// Three-way merge failed.
    #[error("three-way merge failed: {0}")]
    MergeFailed(String),

    /// A change carries an invalid location span.
    #[error("invalid location: start line {start_line} is after end line {end_line}")]
    InvalidLocation { start_line: u32, end_line: u32 },
}
