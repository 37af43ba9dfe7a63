//! External process invocation
//!
//! Every tool the run depends on is called through [`CommandRunner`] with an
//! explicit argument vector. Nothing is passed through a shell, so version and
//! candidate strings typed by the operator can never be interpreted as shell
//! syntax.
//!
//! - **command**: `ToolCommand` (program + argv + working directory)
//! - **system**: `SystemRunner`, the `std::process` backed runner
//! - **locate**: PATH lookup for preflight checks

pub mod command;
pub mod locate;
pub mod system;

#[cfg(test)]
pub mod fake;

pub use command::{CommandOutcome, OutputMode, PipeOutcome, ToolCommand};
pub use system::SystemRunner;

use crate::core::error::VerifyResult;
use std::path::PathBuf;

/// Runs external tools and reports how they exited.
///
/// Implementations block until every spawned process has exited. A nonzero
/// exit is not an error at this level; only failing to start a process is.
pub trait CommandRunner {
  /// Resolve a program name the way the OS would when spawning it
  fn locate(&self, program: &str) -> Option<PathBuf>;

  /// Run one command to completion
  fn run(&self, cmd: &ToolCommand, mode: OutputMode) -> VerifyResult<CommandOutcome>;

  /// Run `producer | consumer` and wait for both
  fn run_piped(&self, producer: &ToolCommand, consumer: &ToolCommand) -> VerifyResult<PipeOutcome>;
}
