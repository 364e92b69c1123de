//! Native command execution.
//!
//! Commands are built as a program plus arguments and spawned directly, without a
//! shell in between. Output is captured and returned as text.

use std::fmt;
use std::process::Command;

use macshift_common::error::ExecError;
use tracing::{debug, trace};

/// A native command, e.g. `ip link set eth0 down`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs a command synchronously and returns its standard output.
///
/// Fails when the command cannot be spawned or exits with a non-zero status.
pub trait CommandExecutor {
    fn run(&self, command: &ShellCommand) -> Result<String, ExecError>;
}

/// Executes commands on the local host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn run(&self, command: &ShellCommand) -> Result<String, ExecError> {
        debug!("Running `{command}`");

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!("`{command}` wrote:\n{stdout}");

        if !output.status.success() {
            return Err(ExecError::ExitStatus {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(stdout)
    }
}
