//! Process-backed executor.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::{ExecError, ExecOutput, Executor};
use crate::config::ExecConfig;

/// Executor that spawns processes on the local machine.
///
/// Programs are started directly, without a shell. Stdout and stderr share
/// one pipe, so the captured output keeps the order the child wrote it in.
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor {
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
    clear_env: bool,
}

impl LocalExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an executor from the `[exec]` config section.
    pub fn from_config(config: &ExecConfig) -> Self {
        Self {
            working_dir: config.working_dir.as_ref().map(PathBuf::from),
            env: config.env.clone(),
            clear_env: config.clear_env,
        }
    }

    /// Run commands in `dir` instead of the current directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set an environment variable for spawned commands.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Start commands with an empty environment (plus anything set via `env`).
    pub fn clear_env(mut self, clear: bool) -> Self {
        self.clear_env = clear;
        self
    }

    fn spawn_and_collect(&self, command: &str, args: &[String]) -> io::Result<ExecOutput> {
        let (mut reader, writer) = io::pipe()?;

        let mut child = {
            let mut cmd = Command::new(command);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            if self.clear_env {
                cmd.env_clear();
            }
            cmd.envs(&self.env);
            if let Some(dir) = &self.working_dir {
                cmd.current_dir(dir);
            }
            cmd.spawn()?
            // `cmd` drops here, closing our copies of the write end
        };

        let mut bytes = Vec::new();
        let read = reader.read_to_end(&mut bytes);
        let status = child.wait()?;
        read?;

        Ok(ExecOutput {
            output: String::from_utf8_lossy(&bytes).into_owned(),
            code: status.code().unwrap_or(-1),
        })
    }
}

impl Executor for LocalExecutor {
    fn run(&self, command: &str, args: &[String]) -> Result<ExecOutput, ExecError> {
        tracing::debug!(command, args = args.len(), "spawning process");
        match self.spawn_and_collect(command, args) {
            Ok(out) => {
                tracing::debug!(command, code = out.code, "process exited");
                Ok(out)
            }
            Err(source) => {
                tracing::warn!(command, error = %source, "could not execute command");
                Err(ExecError::Spawn {
                    command: command.to_string(),
                    source,
                })
            }
        }
    }
}
