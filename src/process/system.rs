//! System process backend
//!
//! Thin wrapper over `std::process::Command`. Each call blocks until the
//! child exits; there are no timeouts, so a hung download or test run blocks
//! the whole verification.

use super::command::{CommandOutcome, OutputMode, PipeOutcome, ToolCommand};
use super::{CommandRunner, locate};
use crate::core::error::{ToolError, VerifyError, VerifyResult};
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// Runner backed by real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
  /// Build a `Command` for a `ToolCommand`
  ///
  /// Sets the working directory if one was given; the environment is inherited
  fn command(&self, cmd: &ToolCommand) -> Command {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);

    if let Some(dir) = &cmd.cwd {
      command.current_dir(dir);
    }

    command
  }
}

fn spawn_error(cmd: &ToolCommand, err: io::Error) -> VerifyError {
  VerifyError::Tool(ToolError::SpawnFailed {
    command: cmd.to_string(),
    reason: err.to_string(),
  })
}

fn outcome_from_status(status: ExitStatus) -> CommandOutcome {
  CommandOutcome {
    code: status.code(),
    ..Default::default()
  }
}

impl CommandRunner for SystemRunner {
  fn locate(&self, program: &str) -> Option<PathBuf> {
    locate::find_executable(program, std::env::var_os("PATH").as_deref())
  }

  fn run(&self, cmd: &ToolCommand, mode: OutputMode) -> VerifyResult<CommandOutcome> {
    tracing::debug!(command = %cmd, cwd = ?cmd.cwd, "spawning");
    let mut command = self.command(cmd);

    let outcome = match mode {
      OutputMode::Inherit => {
        let status = command.status().map_err(|e| spawn_error(cmd, e))?;
        outcome_from_status(status)
      }
      OutputMode::Quiet => {
        let status = command
          .stdout(Stdio::null())
          .stderr(Stdio::inherit())
          .status()
          .map_err(|e| spawn_error(cmd, e))?;
        outcome_from_status(status)
      }
      OutputMode::Capture => {
        // Captured text (gpg's verdict) is echoed and recorded in C locale
        let output = command
          .env("LC_MESSAGES", "C")
          .stdin(Stdio::null())
          .output()
          .map_err(|e| spawn_error(cmd, e))?;
        CommandOutcome {
          code: output.status.code(),
          stdout: String::from_utf8_lossy(&output.stdout).to_string(),
          stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
      }
    };

    tracing::debug!(command = %cmd, code = ?outcome.code, "exited");
    Ok(outcome)
  }

  fn run_piped(&self, producer: &ToolCommand, consumer: &ToolCommand) -> VerifyResult<PipeOutcome> {
    tracing::debug!(producer = %producer, consumer = %consumer, "spawning pipe");

    let mut producer_child = self
      .command(producer)
      .stdout(Stdio::piped())
      .stderr(Stdio::inherit())
      .spawn()
      .map_err(|e| spawn_error(producer, e))?;

    let Some(pipe) = producer_child.stdout.take() else {
      let _ = producer_child.kill();
      let _ = producer_child.wait();
      return Err(VerifyError::message(format!("No stdout pipe for `{}`", producer)));
    };

    let consumer_status = match self
      .command(consumer)
      .stdin(Stdio::from(pipe))
      .stdout(Stdio::null())
      .stderr(Stdio::inherit())
      .spawn()
    {
      Ok(mut child) => child.wait()?,
      Err(e) => {
        let _ = producer_child.kill();
        let _ = producer_child.wait();
        return Err(spawn_error(consumer, e));
      }
    };
    let producer_status = producer_child.wait()?;

    let outcome = PipeOutcome {
      producer: outcome_from_status(producer_status),
      consumer: outcome_from_status(consumer_status),
    };
    tracing::debug!(
      producer = ?outcome.producer.code,
      consumer = ?outcome.consumer.code,
      "pipe exited"
    );
    Ok(outcome)
  }
}
