//! External process execution.
//!
//! Commands are ordered argument lists handed straight to the OS, never a
//! shell string, so paths need no quoting.

use std::fmt;
use std::process::{Command, Stdio};

/// A program plus its ordered argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: vec![] }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// The argument following `flag`, if any.
    pub fn value_after(&self, flag: &str) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(String::as_str)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a finished process exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ProcessOutcome {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a command to completion, blocking the caller.
///
/// There is no timeout: a hung tool hangs the caller.
pub trait ProcessRunner {
    fn run(&self, command: &CommandSpec) -> std::io::Result<ProcessOutcome>;
}

/// Spawns real processes with stdout discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> std::io::Result<ProcessOutcome> {
        tracing::debug!("running {}", command);
        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status();

        match status {
            Ok(status) => Ok(ProcessOutcome { code: status.code() }),
            // A tool that cannot be spawned fails like it would under a shell.
            Err(e) => {
                tracing::debug!("could not spawn {}: {}", command.program, e);
                Ok(ProcessOutcome::failure(spawn_failure_code(&e)))
            }
        }
    }
}

/// Shell exit code for a command that never started.
fn spawn_failure_code(error: &std::io::Error) -> i32 {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => 126,
        _ => 127,
    }
}
