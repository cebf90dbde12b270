#![deny(missing_docs)]

//! # Accom Patch Core
//!
//! Library side of the dashboard maintenance tool: target lookup, the
//! patch engine, and the embedded profile-upload patch set.

/// Shared error types.
pub mod error;

/// Target file lookup.
pub mod locator;

/// The patch engine.
pub mod patcher;

/// The embedded profile-upload patch set.
pub mod recipe;

pub use error::{AppError, AppResult};
pub use locator::{find_matches, locate_single};
pub use patcher::{apply_rules, PatchOutcome, PatchRule, RuleReport};
pub use recipe::{profile_upload_rules, DASHBOARD_FILE_NAME};
