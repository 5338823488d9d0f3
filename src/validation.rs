//! Input validation for git-sync
//!
//! Checks the two strings the engine hands to git that did not come from git
//! itself: generated temp branch names and the temp commit message.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid branch name '{0}': {1}")]
    BranchName(String, &'static str),

    #[error("Commit message cannot be empty")]
    EmptyMessage,

    #[error("Commit message must be a single line")]
    MultilineMessage,
}

/// Prefix shared by every temp branch
pub const TEMP_BRANCH_PREFIX: &str = "temp-";

/// Number of random characters after the prefix
pub const TEMP_BRANCH_SUFFIX_LEN: usize = 8;

fn temp_branch_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^temp-[a-z0-9]{8}$").expect("temp branch pattern is a valid regex")
    })
}

/// Validate a temp branch name
///
/// Rules:
/// - Must start with `temp-`
/// - Followed by exactly 8 lowercase ASCII letters or digits
pub fn validate_temp_branch_name(name: &str) -> Result<(), ValidationError> {
    if !name.starts_with(TEMP_BRANCH_PREFIX) {
        return Err(ValidationError::BranchName(
            name.to_string(),
            "must start with 'temp-'",
        ));
    }

    if !temp_branch_pattern().is_match(name) {
        return Err(ValidationError::BranchName(
            name.to_string(),
            "suffix must be 8 lowercase alphanumeric characters",
        ));
    }

    Ok(())
}

/// Validate a commit message used for the temp commit
pub fn validate_commit_message(message: &str) -> Result<(), ValidationError> {
    if message.trim().is_empty() {
        return Err(ValidationError::EmptyMessage);
    }

    if message.contains('\n') || message.contains('\r') {
        return Err(ValidationError::MultilineMessage);
    }

    Ok(())
}
