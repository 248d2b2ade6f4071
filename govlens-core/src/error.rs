//! Error types for govlens-core

use thiserror::Error;

/// Failure to parse a filter, sort or pattern from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown status filter: {0}")]
    Status(String),

    #[error("Unknown sort option: {0}")]
    Sort(String),

    #[error("Unknown following filter: {0}")]
    Following(String),

    #[error("Invalid path pattern {pattern}: {reason}")]
    Pattern { pattern: String, reason: String },
}

/// Misuse of the follow tracker state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FollowError {
    #[error("A follow change for {0} is already pending")]
    AlreadyPending(String),

    #[error("No follow change pending for {0}")]
    NotPending(String),
}
