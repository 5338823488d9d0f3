//! Error types for git-sync
//!
//! Every failure is fatal to a sync run. The variants are grouped the way an
//! operator needs to read them: something about the repository is not set up
//! right, git printed something we do not understand, the two histories have
//! nothing in common, or a git command itself failed.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for git-sync operations
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Precondition Errors
    // ==========================================================================
    #[error("Branch '{branch}' has no tracking reference configured")]
    NoTrackingBranch { branch: String },

    #[error("Expected exactly one current branch, found {count}")]
    AmbiguousCurrentBranch { count: usize },

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    // ==========================================================================
    // Parse Errors
    // ==========================================================================
    #[error("Malformed status line: '{line}'")]
    MalformedStatusLine { line: String },

    #[error("Malformed branch line: '{line}'")]
    MalformedBranchLine { line: String },

    #[error("Malformed commit line: '{line}'")]
    MalformedCommitLine { line: String },

    #[error("git log returned no commits for '{reference}'")]
    EmptyHistory { reference: String },

    // ==========================================================================
    // Divergence Errors
    // ==========================================================================
    #[error("No common commit between '{local_ref}' and '{remote_ref}'")]
    NoCommonAncestor {
        local_ref: String,
        remote_ref: String,
    },

    // ==========================================================================
    // External Command Errors
    // ==========================================================================
    #[error("Command `{command}` failed ({}): {stderr}", exit_code_display(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    #[error("Invalid branch name '{name}': {reason}")]
    InvalidBranchName { name: String, reason: &'static str },

    #[error("Invalid commit message: {reason}")]
    InvalidCommitMessage { reason: &'static str },

    // ==========================================================================
    // Config Errors
    // ==========================================================================
    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },
}

/// Result type alias for git-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    Parse,
    Divergence,
    ExternalCommand,
    Validation,
    Config,
}

impl ErrorKind {
    /// Process exit status reported by the CLI
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Precondition => 2,
            ErrorKind::Parse => 3,
            ErrorKind::Divergence => 4,
            ErrorKind::ExternalCommand => 5,
            ErrorKind::Validation => 6,
            ErrorKind::Config => 7,
        }
    }
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

// =============================================================================
// Conversions from external error types
// =============================================================================

impl From<crate::validation::ValidationError> for Error {
    fn from(err: crate::validation::ValidationError) -> Self {
        use crate::validation::ValidationError;

        match err {
            ValidationError::BranchName(name, reason) => Error::InvalidBranchName { name, reason },
            ValidationError::EmptyMessage => Error::InvalidCommitMessage {
                reason: "cannot be empty",
            },
            ValidationError::MultilineMessage => Error::InvalidCommitMessage {
                reason: "must be a single line",
            },
        }
    }
}

// =============================================================================
// Error Display Helpers
// =============================================================================

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoTrackingBranch { .. }
            | Error::AmbiguousCurrentBranch { .. }
            | Error::NotARepository { .. } => ErrorKind::Precondition,
            Error::MalformedStatusLine { .. }
            | Error::MalformedBranchLine { .. }
            | Error::MalformedCommitLine { .. }
            | Error::EmptyHistory { .. } => ErrorKind::Parse,
            Error::NoCommonAncestor { .. } => ErrorKind::Divergence,
            Error::CommandFailed { .. } | Error::CommandSpawn { .. } => ErrorKind::ExternalCommand,
            Error::InvalidBranchName { .. } | Error::InvalidCommitMessage { .. } => {
                ErrorKind::Validation
            }
            Error::ConfigRead { .. } | Error::ConfigParse { .. } => ErrorKind::Config,
        }
    }

    /// Returns an operator-facing hint for recovering from the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::NoTrackingBranch { .. } => {
                Some("Set an upstream first: git branch --set-upstream-to=<remote>/<branch>")
            }
            Error::AmbiguousCurrentBranch { .. } => {
                Some("Check out a branch; a detached HEAD cannot be synced")
            }
            Error::NoCommonAncestor { .. } => {
                Some("Histories have diverged completely; rebase or force-push manually")
            }
            Error::CommandFailed { .. } => Some(
                "The repository may be left mid-rebase or mid-cherry-pick, and a temp-* branch may \
                 hold your uncommitted work; check `git status` and `git branch`",
            ),
            Error::CommandSpawn { .. } => Some("Make sure git is installed and on PATH"),
            _ => None,
        }
    }
}
