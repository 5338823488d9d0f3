//! Locating the newest commit shared by local and remote history

use std::collections::HashMap;
use tracing::info;

use crate::git::Commit;
use crate::{Error, Result};

/// Position of the common commit in both histories
///
/// Offsets count from the newest commit on each side, so they are also the
/// ahead (local) and behind (remote) counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitComparison {
    pub local_index: usize,
    pub remote_index: usize,
}

impl CommitComparison {
    /// Local has commits the remote is missing
    pub fn push_required(&self) -> bool {
        self.local_index > 0
    }

    /// Remote has commits local is missing
    pub fn pull_required(&self) -> bool {
        self.remote_index > 0
    }
}

/// Find the newest local commit that also appears in `remote`
///
/// Both slices are newest-first.
pub fn find_common_commit(local: &[Commit], remote: &[Commit]) -> Option<CommitComparison> {
    let remote_index: HashMap<&str, usize> = remote
        .iter()
        .enumerate()
        .map(|(i, commit)| (commit.hash.as_str(), i))
        .collect();

    local.iter().enumerate().find_map(|(local_index, commit)| {
        remote_index
            .get(commit.hash.as_str())
            .map(|&remote_index| CommitComparison {
                local_index,
                remote_index,
            })
    })
}

/// [`find_common_commit`], failing with [`Error::NoCommonAncestor`] when the
/// histories share nothing
pub fn compare_histories(
    local: &[Commit],
    remote: &[Commit],
    local_ref: &str,
    remote_ref: &str,
) -> Result<CommitComparison> {
    let comparison =
        find_common_commit(local, remote).ok_or_else(|| Error::NoCommonAncestor {
            local_ref: local_ref.to_string(),
            remote_ref: remote_ref.to_string(),
        })?;

    let common = &local[comparison.local_index];
    info!(
        hash = %common.hash,
        message = %common.message,
        ahead = comparison.local_index,
        behind = comparison.remote_index,
        "common commit found"
    );

    Ok(comparison)
}
