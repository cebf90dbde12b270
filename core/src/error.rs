//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`; the locate failures are
/// distinct variants so callers can tell "nothing found" from
/// "too many candidates" without string matching.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// No file with the expected name exists under the search root.
    #[from(ignore)]
    #[display("Target not found: {_0}")]
    TargetNotFound(String),

    /// More than one file with the expected name exists under the search root.
    #[from(ignore)]
    #[display("Ambiguous target: {_0}")]
    AmbiguousTarget(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
