//! Error types shared across the framework.
//!
//! Follows the error-handling design in §7: construction errors fail fast,
//! I/O errors propagate to the app loop for a graceful teardown, and every
//! other recoverable condition (reconciler mismatches, layout overflow,
//! malformed input) is absorbed at its own boundary rather than surfaced
//! here.

use std::io;

/// Errors that can escape the public API.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The app was constructed with invalid or missing collaborators.
    #[error("invalid app configuration: {0}")]
    Construction(String),

    /// A presentation or workload adapter failed doing terminal I/O.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input channel closed while the app loop was still running.
    #[error("input channel closed")]
    ChannelClosed,

    /// The app loop was asked to shut down via its cancellation signal.
    #[error("app loop cancelled")]
    Cancelled,
}

/// Convenience alias for fallible framework operations.
pub type Result<T> = std::result::Result<T, Error>;
