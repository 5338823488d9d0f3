//! Git sync operations
//!
//! Reconciles the current branch with its remote tracking branch in one run:
//!
//! 1. Identify the current branch and the remote it tracks.
//! 2. Fold uncommitted work into a temp commit on a throwaway branch.
//! 3. Fetch all remotes.
//! 4. Compare local and remote history to get ahead/behind counts.
//! 5. Rebase-pull if the remote is ahead.
//! 6. Cherry-pick the temp commit on top.
//! 7. Push if anything local is missing remotely.
//!
//! Pull always precedes cherry-pick, and cherry-pick always precedes push.
//! Any error stops the run where it is; temp branches and half-finished
//! rebases are left for the operator.

use std::fmt;
use tracing::{info, warn};

mod compare;
mod resolve;

pub use compare::{compare_histories, find_common_commit, CommitComparison};
pub use resolve::{resolve_local_changes, TempCommit};

use crate::git::{Commit, CommandRunner, Git};
use crate::validation::validate_commit_message;
use crate::Result;

/// Subject of the auto-generated commit holding uncommitted work
pub const DEFAULT_COMMIT_MESSAGE: &str = "[Auto] Syncing local changes with remote";

/// Caller-supplied switches for one sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Log mutating steps instead of running them
    pub dry_run: bool,
    /// Dump both commit histories as JSON
    pub verbose: bool,
    /// Message for the temp commit
    pub commit_message: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            verbose: false,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}

/// A mutating step issued after history comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Pull,
    CherryPick,
    Push,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncAction::Pull => "pull",
            SyncAction::CherryPick => "cherry-pick",
            SyncAction::Push => "push",
        })
    }
}

/// Result of a sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub branch: String,
    pub remote: String,
    pub temp_commit: Option<TempCommit>,
    /// Commits on local not yet on the remote
    pub ahead: usize,
    /// Commits on the remote not yet on local
    pub behind: usize,
    /// Actions in the order they were issued (or would have been)
    pub actions: Vec<SyncAction>,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn pulled(&self) -> bool {
        self.actions.contains(&SyncAction::Pull)
    }

    pub fn cherry_picked(&self) -> bool {
        self.actions.contains(&SyncAction::CherryPick)
    }

    pub fn pushed(&self) -> bool {
        self.actions.contains(&SyncAction::Push)
    }

    /// Nothing needed doing
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Run the full reconciliation protocol against `git`
pub fn sync<R: CommandRunner>(git: &Git<R>, options: &SyncOptions) -> Result<SyncReport> {
    validate_commit_message(&options.commit_message)?;
    let dry_run = options.dry_run;

    info!("identifying current branch");
    let current = git.current_branch()?;
    let remote = current.require_tracking()?.remote.clone();
    info!(branch = %current.name, remote = %remote, "current branch identified");

    let temp_commit = resolve_local_changes(git, &current, options)?;

    info!(dry_run, "fetching all remotes");
    if !dry_run {
        git.fetch_all()?;
    }

    let remote_ref = format!("{}/{}", remote, current.name);
    let local_commits = git.commits(None, None)?;
    let remote_commits = git.commits(Some(remote_ref.as_str()), None)?;

    if options.verbose {
        log_commits(&current.name, &local_commits);
        log_commits(&remote_ref, &remote_commits);
    }

    let comparison =
        compare_histories(&local_commits, &remote_commits, &current.name, &remote_ref)?;

    let mut push_required = temp_commit.is_some();
    if comparison.push_required() {
        info!(ahead = comparison.local_index, "local has commits the remote is missing");
        push_required = true;
    }
    let pull_required = comparison.pull_required();
    if pull_required {
        info!(behind = comparison.remote_index, "remote has commits local is missing");
    }

    let mut actions = Vec::new();

    if pull_required {
        info!(remote = %remote, branch = %current.name, dry_run, "pulling from remote with rebase");
        if !dry_run {
            git.pull(&remote, &current.name, true)?;
        }
        actions.push(SyncAction::Pull);
    }

    if let Some(temp) = &temp_commit {
        info!(branch = %temp.branch(), dry_run, "cherry-picking temp commit");
        match temp.hash() {
            Some(hash) if !dry_run => git.cherry_pick(hash)?,
            _ => {}
        }
        actions.push(SyncAction::CherryPick);
    }

    if push_required {
        info!(remote = %remote, branch = %current.name, dry_run, "pushing to remote");
        if !dry_run {
            git.push(&remote, &current.name)?;
        }
        actions.push(SyncAction::Push);
    }

    if let Some(temp) = &temp_commit {
        info!(branch = %temp.branch(), "temp branch left in place");
    }
    if actions.is_empty() {
        info!("already in sync");
    }

    Ok(SyncReport {
        branch: current.name,
        remote,
        temp_commit,
        ahead: comparison.local_index,
        behind: comparison.remote_index,
        actions,
        dry_run,
    })
}

fn log_commits(reference: &str, commits: &[Commit]) {
    match serde_json::to_string_pretty(&serde_json::json!({ "commits": commits })) {
        Ok(json) => info!(reference, count = commits.len(), "commits\n{}", json),
        Err(err) => warn!(reference, error = %err, "failed to serialize commits"),
    }
}
