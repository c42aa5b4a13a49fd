//! Running external commands.

mod local;
mod mock;

use std::io;
use thiserror::Error;

use crate::shell::{ParseError, tokenize};

pub use local::LocalExecutor;
pub use mock::MockExecutor;

/// Errors that can occur when running a command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("unable to parse command line: {0}")]
    Parse(#[from] ParseError),

    #[error("could not execute command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("process returned with code {code}")]
    NonZeroExit { code: i32, output: String },
}

impl ExecError {
    /// Short stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ExecError::Parse(_) => "parse",
            ExecError::Spawn { .. } => "spawn",
            ExecError::NonZeroExit { .. } => "non_zero_exit",
        }
    }
}

/// Result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// Interleaved stdout and stderr.
    pub output: String,
    /// Exit code, `-1` if the process was terminated by a signal.
    pub code: i32,
}

impl ExecOutput {
    pub fn new(output: impl Into<String>, code: i32) -> Self {
        Self {
            output: output.into(),
            code,
        }
    }

    /// Check if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Turn a non-zero exit into an error, passing the output through otherwise.
    pub fn into_checked(self) -> Result<String, ExecError> {
        if self.success() {
            Ok(self.output)
        } else {
            Err(ExecError::NonZeroExit {
                code: self.code,
                output: self.output,
            })
        }
    }
}

/// Something that can run commands.
///
/// A non-zero exit code is reported through [`ExecOutput::code`], not as an
/// error. The `*_checked` variants turn it into [`ExecError::NonZeroExit`].
pub trait Executor: Send + Sync {
    /// Run `command` with pre-split arguments.
    fn run(&self, command: &str, args: &[String]) -> Result<ExecOutput, ExecError>;

    /// Split `line` and run the result.
    fn run_line(&self, line: &str) -> Result<ExecOutput, ExecError> {
        let parsed = tokenize(line)?;
        self.run(&parsed.command, &parsed.args)
    }

    /// Like [`Executor::run`], but fails on a non-zero exit code.
    fn run_checked(&self, command: &str, args: &[String]) -> Result<String, ExecError> {
        self.run(command, args)?.into_checked()
    }

    /// Like [`Executor::run_line`], but fails on a non-zero exit code.
    fn run_line_checked(&self, line: &str) -> Result<String, ExecError> {
        self.run_line(line)?.into_checked()
    }
}

/// Run a command on the local machine.
pub fn run(command: &str, args: &[String]) -> Result<ExecOutput, ExecError> {
    LocalExecutor::new().run(command, args)
}

/// Split and run a command line on the local machine.
pub fn run_line(line: &str) -> Result<ExecOutput, ExecError> {
    LocalExecutor::new().run_line(line)
}

/// Run a command on the local machine, failing on a non-zero exit code.
pub fn run_checked(command: &str, args: &[String]) -> Result<String, ExecError> {
    LocalExecutor::new().run_checked(command, args)
}

/// Split and run a command line on the local machine, failing on a non-zero exit code.
pub fn run_line_checked(line: &str) -> Result<String, ExecError> {
    LocalExecutor::new().run_line_checked(line)
}
