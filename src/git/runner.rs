//! Process execution for git commands
//!
//! All git access goes through [`CommandRunner`] so the sync protocol can be
//! driven against a scripted runner in tests.

use std::path::PathBuf;
use std::process::Command;

use crate::{Error, Result};

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs git with the given arguments and blocks until it exits
pub trait CommandRunner {
    /// `args` excludes the program name itself.
    fn run(&self, args: &[&str]) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(args)
    }
}

/// Runs a real git binary inside a working directory
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    workdir: PathBuf,
}

impl ProcessRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("git"),
            workdir: workdir.into(),
        }
    }

    /// Use a git binary other than the one found on PATH
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| Error::CommandSpawn {
                command: display_command(args),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Render a git argv for logs and error messages
pub fn display_command(args: &[&str]) -> String {
    let mut command = String::from("git");
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}
