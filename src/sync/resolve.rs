//! Folding uncommitted work into a single commit on a temp branch

use tracing::info;

use super::SyncOptions;
use crate::git::{Branch, CommandRunner, Git, TempBranchName};
use crate::{Error, Result};

/// The commit holding uncommitted work, if one was needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TempCommit {
    /// Created and reachable from `branch`
    Committed { branch: TempBranchName, hash: String },
    /// Dry run: what would have been created
    Planned { branch: TempBranchName },
}

impl TempCommit {
    pub fn branch(&self) -> &TempBranchName {
        match self {
            TempCommit::Committed { branch, .. } | TempCommit::Planned { branch } => branch,
        }
    }

    pub fn hash(&self) -> Option<&str> {
        match self {
            TempCommit::Committed { hash, .. } => Some(hash.as_str()),
            TempCommit::Planned { .. } => None,
        }
    }
}

/// Commit any uncommitted work onto a fresh temp branch, then return to
/// `current`
///
/// Returns `None` when the working tree is clean. Afterwards the working tree
/// is clean relative to `current`, and the work lives in exactly one commit
/// reachable only through the temp branch. Any failing git command aborts
/// immediately and nothing is undone.
pub fn resolve_local_changes<R: CommandRunner>(
    git: &Git<R>,
    current: &Branch,
    options: &SyncOptions,
) -> Result<Option<TempCommit>> {
    let dry_run = options.dry_run;
    let status = git.status()?;

    if !status.needs_commit() {
        info!("no local changes need to be committed");
        return Ok(None);
    }
    info!(
        staged_modified = status.staged_modified.len(),
        staged_added = status.staged_added.len(),
        unstaged_modified = status.unstaged_modified.len(),
        untracked = status.untracked.len(),
        "local changes need to be committed"
    );

    let temp_branch = TempBranchName::generate()?;

    info!(branch = %temp_branch, dry_run, "creating temp branch");
    if !dry_run {
        git.create_branch(temp_branch.as_str())?;
    }

    info!(branch = %temp_branch, dry_run, "checking out temp branch");
    if !dry_run {
        git.checkout(temp_branch.as_str())?;
    }

    if status.needs_staging() {
        info!(dry_run, "staging all local changes");
        if !dry_run {
            git.add_all()?;
        }
    }

    info!(message = %options.commit_message, dry_run, "committing local changes");
    if !dry_run {
        git.commit(&options.commit_message)?;
    }

    let temp_commit = if dry_run {
        TempCommit::Planned {
            branch: temp_branch,
        }
    } else {
        // The temp branch is checked out, so HEAD is the new commit.
        let hash = git
            .commits(None, Some(1))?
            .into_iter()
            .next()
            .map(|commit| commit.hash)
            .ok_or_else(|| Error::EmptyHistory {
                reference: temp_branch.to_string(),
            })?;
        info!(hash = %hash, "temp commit created");
        TempCommit::Committed {
            branch: temp_branch,
            hash,
        }
    };

    info!(branch = %current.name, dry_run, "checking out original branch");
    if !dry_run {
        git.checkout(&current.name)?;
    }

    Ok(Some(temp_commit))
}
