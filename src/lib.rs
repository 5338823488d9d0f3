//! git-sync - one-step local/remote branch reconciliation
//!
//! Brings the current branch and its remote tracking branch into agreement
//! without a manual commit, rebase and push.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Sync Orchestrator                         │
//! │   branch → local changes → fetch → compare → pull → pick → push │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────┐        ┌───────────────────────────┐  │
//! │  │ Local Change         │        │ Commit History            │  │
//! │  │ Resolver             │        │ Comparator                │  │
//! │  │ (temp branch+commit) │        │ (common commit, ahead/    │  │
//! │  └──────────┬───────────┘        │  behind counts)           │  │
//! │             │                    └─────────────┬─────────────┘  │
//! │             ▼                                  │                │
//! │  ┌──────────────────────┐                      │                │
//! │  │ Temp Branch Namer    │                      │                │
//! │  └──────────────────────┘                      │                │
//! │             │                                  │                │
//! │             ▼                                  ▼                │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │               Git Backend (Repository State Reader)         ││
//! │  │  status · branches · log · fetch · add · commit · checkout  ││
//! │  │  branch · pull --rebase · cherry-pick · push                ││
//! │  └──────────────────────────┬──────────────────────────────────┘│
//! │                             ▼                                   │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │              CommandRunner (git subprocess)                 ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod sync;
pub mod validation;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use sync::{SyncAction, SyncOptions, SyncReport};

use std::path::{Path, PathBuf};

use git::{Git, ProcessRunner};

/// A working copy driven through the git binary
pub struct Repository {
    /// Directory git runs in
    pub root: PathBuf,
    /// Git handle
    pub git: Git<ProcessRunner>,
}

impl Repository {
    /// Open the repository containing `path` using the git binary on PATH
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(path, Path::new("git"))
    }

    /// Open the repository containing `path` using a specific git binary
    pub fn open_with(path: impl Into<PathBuf>, git_binary: &Path) -> Result<Self> {
        let root = path.into();
        let git = Git::new(ProcessRunner::new(&root).with_program(git_binary));

        if !git.is_repository()? {
            return Err(Error::NotARepository { path: root });
        }

        Ok(Self { root, git })
    }

    /// Reconcile the current branch with its remote tracking branch
    pub fn sync(&self, options: &SyncOptions) -> Result<SyncReport> {
        sync::sync(&self.git, options)
    }

    pub fn status(&self) -> Result<git::WorkingTreeStatus> {
        self.git.status()
    }

    pub fn branches(&self) -> Result<Vec<git::Branch>> {
        self.git.branches()
    }

    pub fn commits(&self, reference: Option<&str>, limit: Option<usize>) -> Result<Vec<git::Commit>> {
        self.git.commits(reference, limit)
    }
}
