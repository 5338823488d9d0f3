//! Git backend for git-sync
//!
//! A thin shim over the git binary: read-only queries that parse git's output
//! into snapshots, and mutating primitives that run one command each.
//!
//! # Execution Model
//!
//! Every call blocks until its git process exits. There are no retries and no
//! timeouts; a non-zero exit becomes [`Error::CommandFailed`]. Whether a
//! mutating primitive should run at all (dry run) is decided by the caller,
//! never here.

use tracing::debug;

mod branch;
mod commit;
mod runner;
mod status;
mod temp_branch;

pub use branch::{Branch, TrackingRef};
pub use commit::Commit;
pub use runner::{display_command, CommandOutput, CommandRunner, ProcessRunner};
pub use status::WorkingTreeStatus;
pub use temp_branch::TempBranchName;

use crate::{Error, Result};

/// Git repository handle backed by a [`CommandRunner`]
#[derive(Debug, Clone)]
pub struct Git<R> {
    runner: R,
}

impl<R: CommandRunner> Git<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run a command and fail on non-zero exit
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(command = %display_command(args), "running git");
        let output = self.runner.run(args)?;

        if !output.success() {
            return Err(Error::CommandFailed {
                command: display_command(args),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        if !output.stdout.trim().is_empty() {
            debug!(stdout = %output.stdout.trim_end(), "git output");
        }
        Ok(output.stdout)
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// True if the working directory is inside a git repository
    pub fn is_repository(&self) -> Result<bool> {
        let output = self.runner.run(&["rev-parse", "--git-dir"])?;
        Ok(output.success())
    }

    pub fn branches(&self) -> Result<Vec<Branch>> {
        let format = format!("--format={}", branch::BRANCH_FORMAT);
        let output = self.run(&["for-each-ref", &format, "refs/heads/"])?;
        Branch::parse_list(&output)
    }

    pub fn current_branch(&self) -> Result<Branch> {
        let branches = self.branches()?;
        Branch::find_current(&branches).cloned()
    }

    /// Commits newest-first
    ///
    /// `reference` defaults to the current branch. Without `limit` the whole
    /// reachable history is read.
    pub fn commits(&self, reference: Option<&str>, limit: Option<usize>) -> Result<Vec<Commit>> {
        let limit = limit.map(|n| n.to_string());

        let mut args = vec!["log", commit::LOG_FORMAT];
        if let Some(limit) = limit.as_deref() {
            args.extend(["--max-count", limit]);
        }
        if let Some(reference) = reference {
            args.extend([reference, "--"]);
        }

        let output = self.run(&args)?;
        Commit::parse_log(&output)
    }

    pub fn status(&self) -> Result<WorkingTreeStatus> {
        let output = self.run(&["status", "--porcelain", "-z"])?;
        WorkingTreeStatus::parse(&output)
    }

    // ==========================================================================
    // Mutations
    // ==========================================================================

    pub fn fetch_all(&self) -> Result<()> {
        self.run(&["fetch", "--all"]).map(drop)
    }

    pub fn add_all(&self) -> Result<()> {
        self.run(&["add", "--all"]).map(drop)
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "--message", message]).map(drop)
    }

    pub fn create_branch(&self, name: &str) -> Result<()> {
        self.run(&["branch", name]).map(drop)
    }

    /// Check out a branch, tag or hash
    pub fn checkout(&self, target: &str) -> Result<()> {
        self.run(&["checkout", target]).map(drop)
    }

    pub fn pull(&self, remote: &str, branch: &str, rebase: bool) -> Result<()> {
        let mut args = vec!["pull"];
        if rebase {
            args.push("--rebase");
        }
        args.extend([remote, branch]);
        self.run(&args).map(drop)
    }

    pub fn cherry_pick(&self, hash: &str) -> Result<()> {
        self.run(&["cherry-pick", hash]).map(drop)
    }

    pub fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).map(drop)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner shared by unit tests

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replies to commands in order of registration by prefix match and
    /// records every argv it sees. Unmatched commands succeed with no output.
    #[derive(Default)]
    pub struct ScriptedRunner {
        replies: RefCell<VecDeque<(Vec<String>, CommandOutput)>>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reply once with `stdout` to the next command starting with `prefix`
        pub fn reply(self, prefix: &[&str], stdout: &str) -> Self {
            self.reply_with(
                prefix,
                CommandOutput {
                    code: Some(0),
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
            )
        }

        /// Fail once with `code` on the next command starting with `prefix`
        pub fn fail(self, prefix: &[&str], code: i32) -> Self {
            self.reply_with(
                prefix,
                CommandOutput {
                    code: Some(code),
                    stdout: String::new(),
                    stderr: "scripted failure".to_string(),
                },
            )
        }

        fn reply_with(self, prefix: &[&str], output: CommandOutput) -> Self {
            self.replies
                .borrow_mut()
                .push_back((prefix.iter().map(|s| s.to_string()).collect(), output));
            self
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }

        /// Subcommands (first argv element) in call order
        pub fn subcommands(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|call| call.first().cloned())
                .collect()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, args: &[&str]) -> Result<CommandOutput> {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());

            let mut replies = self.replies.borrow_mut();
            let matched = replies.iter().position(|(prefix, _)| {
                prefix.len() <= args.len() && prefix.iter().zip(args).all(|(p, a)| p == a)
            });

            Ok(match matched.and_then(|i| replies.remove(i)) {
                Some((_, output)) => output,
                None => CommandOutput {
                    code: Some(0),
                    ..CommandOutput::default()
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedRunner;
    use super::*;

    #[test]
    fn test_commits_args() {
        let git = Git::new(ScriptedRunner::new());
        git.commits(Some("origin/main"), Some(1)).unwrap();
        git.commits(None, None).unwrap();

        let calls = git.runner().calls();
        assert_eq!(
            calls[0],
            vec!["log", "--pretty=format:%H|%s", "--max-count", "1", "origin/main", "--"]
        );
        assert_eq!(calls[1], vec!["log", "--pretty=format:%H|%s"]);
    }

    #[test]
    fn test_pull_rebase_args() {
        let git = Git::new(ScriptedRunner::new());
        git.pull("origin", "main", true).unwrap();
        git.pull("origin", "main", false).unwrap();

        let calls = git.runner().calls();
        assert_eq!(calls[0], vec!["pull", "--rebase", "origin", "main"]);
        assert_eq!(calls[1], vec!["pull", "origin", "main"]);
    }

    #[test]
    fn test_non_zero_exit_is_command_failed() {
        let git = Git::new(ScriptedRunner::new().fail(&["push"], 128));
        let err = git.push("origin", "main").unwrap_err();

        match err {
            Error::CommandFailed {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "git push origin main");
                assert_eq!(code, Some(128));
                assert_eq!(stderr, "scripted failure");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_current_branch_from_listing() {
        let hash = "0123456789abcdef0123456789abcdef01234567";
        let listing = format!("false dev  {h}\ntrue main origin/main {h}\n", h = hash);
        let git = Git::new(ScriptedRunner::new().reply(&["for-each-ref"], &listing));

        let branch = git.current_branch().unwrap();
        assert_eq!(branch.name, "main");
        assert_eq!(branch.tracking.unwrap().remote, "origin");
    }

    #[test]
    fn test_status_parse_error_propagates() {
        let git = Git::new(ScriptedRunner::new().reply(&["status"], "D  removed.txt\0"));
        assert!(matches!(
            git.status(),
            Err(Error::MalformedStatusLine { .. })
        ));
    }

    #[test]
    fn test_status_reads_nul_separated_paths() {
        let git = Git::new(ScriptedRunner::new().reply(&["status"], "?? my notes.txt\0"));
        let status = git.status().unwrap();

        assert_eq!(status.untracked, vec!["my notes.txt"]);
        assert_eq!(git.runner().calls()[0], vec!["status", "--porcelain", "-z"]);
    }

    #[test]
    fn test_is_repository_does_not_fail_on_exit_code() {
        let git = Git::new(ScriptedRunner::new().fail(&["rev-parse"], 128));
        assert!(!git.is_repository().unwrap());
    }
}
