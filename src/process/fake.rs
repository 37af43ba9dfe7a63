//! Recording runner for tests

use super::command::{CommandOutcome, OutputMode, PipeOutcome, ToolCommand};
use super::CommandRunner;
use crate::core::error::{ToolError, VerifyError, VerifyResult};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

type Hook = Box<dyn Fn(&ToolCommand)>;

/// Runner that never spawns anything.
///
/// Commands are matched by `ToolCommand::key()` (`git clone`) first and then
/// by program name (`git`). Unmatched commands exit 0 with no output.
#[derive(Default)]
pub struct FakeRunner {
  missing: HashSet<String>,
  unspawnable: HashSet<String>,
  exit_codes: HashMap<String, i32>,
  outputs: HashMap<String, String>,
  hooks: HashMap<String, Hook>,
  calls: RefCell<Vec<ToolCommand>>,
}

impl FakeRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make `program` unresolvable on PATH
  pub fn missing(mut self, program: &str) -> Self {
    self.missing.insert(program.to_string());
    self
  }

  /// Fail to spawn a key or program, as a vanished executable would
  pub fn unspawnable(mut self, key: &str) -> Self {
    self.unspawnable.insert(key.to_string());
    self
  }

  /// Exit code for a key or program
  pub fn exit(mut self, key: &str, code: i32) -> Self {
    self.exit_codes.insert(key.to_string(), code);
    self
  }

  /// Captured stdout for a key or program
  pub fn output(mut self, key: &str, text: &str) -> Self {
    self.outputs.insert(key.to_string(), text.to_string());
    self
  }

  /// Side effect run when a key or program is invoked
  pub fn on(mut self, key: &str, hook: impl Fn(&ToolCommand) + 'static) -> Self {
    self.hooks.insert(key.to_string(), Box::new(hook));
    self
  }

  /// Every command run so far, rendered
  pub fn calls(&self) -> Vec<String> {
    self.calls.borrow().iter().map(|c| c.to_string()).collect()
  }

  /// Every command run so far
  pub fn commands(&self) -> Vec<ToolCommand> {
    self.calls.borrow().clone()
  }

  /// Whether any command with this key or program ran
  pub fn ran(&self, key: &str) -> bool {
    self
      .calls
      .borrow()
      .iter()
      .any(|c| c.key() == key || c.program == key)
  }

  fn lookup<'a, T>(map: &'a HashMap<String, T>, cmd: &ToolCommand) -> Option<&'a T> {
    map.get(&cmd.key()).or_else(|| map.get(&cmd.program))
  }

  fn execute(&self, cmd: &ToolCommand) -> CommandOutcome {
    self.calls.borrow_mut().push(cmd.clone());

    if let Some(hook) = Self::lookup(&self.hooks, cmd) {
      hook(cmd);
    }

    CommandOutcome {
      code: Some(Self::lookup(&self.exit_codes, cmd).copied().unwrap_or(0)),
      stdout: Self::lookup(&self.outputs, cmd).cloned().unwrap_or_default(),
      stderr: String::new(),
    }
  }
}

impl CommandRunner for FakeRunner {
  fn locate(&self, program: &str) -> Option<PathBuf> {
    if self.missing.contains(program) {
      None
    } else {
      Some(PathBuf::from("/usr/bin").join(program))
    }
  }

  fn run(&self, cmd: &ToolCommand, _mode: OutputMode) -> VerifyResult<CommandOutcome> {
    if self.unspawnable.contains(&cmd.key()) || self.unspawnable.contains(&cmd.program) {
      self.calls.borrow_mut().push(cmd.clone());
      return Err(VerifyError::Tool(ToolError::SpawnFailed {
        command: cmd.to_string(),
        reason: "No such file or directory (os error 2)".to_string(),
      }));
    }
    Ok(self.execute(cmd))
  }

  fn run_piped(&self, producer: &ToolCommand, consumer: &ToolCommand) -> VerifyResult<PipeOutcome> {
    Ok(PipeOutcome {
      producer: self.execute(producer),
      consumer: self.execute(consumer),
    })
  }
}
