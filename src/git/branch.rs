//! Local branch snapshots
//!
//! Read with `git for-each-ref` over `refs/heads/`, one line per branch:
//! `<true|false> <name> <upstream> <hash>`, where `<upstream>` is empty when
//! no tracking reference is configured.

use serde::Serialize;
use std::fmt;

use crate::{Error, Result};

/// `for-each-ref` format matching [`Branch::parse_line`]
pub(crate) const BRANCH_FORMAT: &str = "%(if)%(HEAD)%(then)true%(else)false%(end) \
                                         %(refname:short) %(upstream:short) %(objectname)";

/// Remote/branch pair a local branch synchronizes against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingRef {
    pub remote: String,
    pub branch: String,
}

impl TrackingRef {
    /// Split `remote/branch` on the first `/`
    ///
    /// Returns `None` for an upstream without a remote part, which is what
    /// git reports when a branch tracks another local branch.
    pub fn parse(upstream: &str) -> Option<Self> {
        let (remote, branch) = upstream.split_once('/')?;
        if remote.is_empty() || branch.is_empty() {
            return None;
        }
        Some(Self {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })
    }
}

impl fmt::Display for TrackingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// A local branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    pub tracking: Option<TrackingRef>,
    pub head_hash: String,
}

impl Branch {
    /// Parse `for-each-ref` output produced with [`BRANCH_FORMAT`]
    pub fn parse_list(output: &str) -> Result<Vec<Self>> {
        output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Result<Self> {
        let malformed = || Error::MalformedBranchLine {
            line: line.to_string(),
        };

        let fields: Vec<&str> = line.split(' ').collect();
        let [current, name, upstream, hash] = fields.as_slice() else {
            return Err(malformed());
        };

        let is_current = match *current {
            "true" => true,
            "false" => false,
            _ => return Err(malformed()),
        };
        if name.is_empty() || hash.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            name: name.to_string(),
            is_current,
            tracking: TrackingRef::parse(upstream),
            head_hash: hash.to_string(),
        })
    }

    /// The single branch marked current
    pub fn find_current(branches: &[Branch]) -> Result<&Branch> {
        let mut current = branches.iter().filter(|branch| branch.is_current);
        match (current.next(), current.next()) {
            (Some(branch), None) => Ok(branch),
            _ => Err(Error::AmbiguousCurrentBranch {
                count: branches.iter().filter(|branch| branch.is_current).count(),
            }),
        }
    }

    /// Tracking reference, or a precondition error naming this branch
    pub fn short_hash(&self) -> &str {
        super::commit::short_hash(&self.head_hash)
    }

    pub fn require_tracking(&self) -> Result<&TrackingRef> {
        self.tracking.as_ref().ok_or_else(|| Error::NoTrackingBranch {
            branch: self.name.clone(),
        })
    }
}
