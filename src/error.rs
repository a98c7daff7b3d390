//! Error types for `Forsooth`.
//!
//! Two error surfaces exist: rule-data diagnostics that the loader logs
//! and swallows (the engine degrades to pass-through instead of
//! failing), and the command dispatcher's error contract that the timer
//! executor reacts to.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `forsooth` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Rule document error (missing file, parse failure, empty tables)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Rule Data Errors
// ============================================================================

/// Diagnostics produced while loading a rule document.
///
/// These never escape [`crate::rules::RuleSet::load`]: the loader logs
/// them at warning level and returns an invalid `RuleSet`, which forces
/// the engine into pass-through mode.
#[derive(Debug, Error)]
pub enum DataError {
    /// The document could not be parsed as JSON
    #[error("unable to parse rule document {path}: {message}")]
    Parse {
        /// Path to the rule document
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// The document file does not exist or could not be read
    #[error("rule document not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },
}

// ============================================================================
// Command Dispatch Errors
// ============================================================================

/// Error contract of the external command dispatcher.
///
/// The first four variants are the recognized domain failures a command
/// may raise; the executor reports them verbatim to the issuing actor.
/// [`CommandError::Internal`] is the channel for everything unexpected
/// and is reported with a generic message and logged.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The issuing client is in the wrong state for the command
    #[error("{0}")]
    Client(String),

    /// The target area rejected the command
    #[error("{0}")]
    Area(String),

    /// The command arguments were malformed
    #[error("{0}")]
    Argument(String),

    /// The server rejected the command
    #[error("{0}")]
    Server(String),

    /// Unexpected failure inside the dispatcher
    #[error("{0}")]
    Internal(String),
}

impl CommandError {
    /// Returns true for the unexpected-failure channel.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
