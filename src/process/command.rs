use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A program, its arguments and the directory it runs in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCommand {
  pub program: String,
  pub args: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cwd: Option<PathBuf>,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Append a filesystem path as an argument
  pub fn path_arg(self, path: &Path) -> Self {
    self.arg(path.display().to_string())
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  /// `program arg0`, used to tell `git clone` from `git archive`
  #[cfg(test)]
  pub fn key(&self) -> String {
    match self.args.first() {
      Some(first) => format!("{} {}", self.program, first),
      None => self.program.clone(),
    }
  }
}

impl fmt::Display for ToolCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.is_empty() || arg.contains(char::is_whitespace) {
        write!(f, " '{}'", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// What happens to a child's stdout/stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
  /// Both streams go straight to the terminal
  Inherit,
  /// stdout is discarded, stderr goes to the terminal
  Quiet,
  /// Both streams are collected into the outcome
  Capture,
}

/// How a finished command exited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
  /// Exit code, `None` if the process was killed by a signal
  pub code: Option<i32>,
  /// Collected stdout (empty unless captured)
  pub stdout: String,
  /// Collected stderr (empty unless captured)
  pub stderr: String,
}

impl CommandOutcome {
  #[cfg(test)]
  pub fn exited(code: i32) -> Self {
    Self {
      code: Some(code),
      ..Default::default()
    }
  }

  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// stdout followed by stderr, for tools (gpg) that report on either
  pub fn combined_output(&self) -> String {
    let mut text = self.stdout.clone();
    if !self.stdout.is_empty() && !self.stdout.ends_with('\n') && !self.stderr.is_empty() {
      text.push('\n');
    }
    text.push_str(&self.stderr);
    text
  }
}

/// Outcome of both sides of a `producer | consumer` pipe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeOutcome {
  pub producer: CommandOutcome,
  pub consumer: CommandOutcome,
}

impl PipeOutcome {
  pub fn success(&self) -> bool {
    self.producer.success() && self.consumer.success()
  }

  /// Exit code of the side that failed first.
  ///
  /// A producer killed by a signal while the consumer exited nonzero lost its
  /// reader (SIGPIPE), so the consumer's code is the one that explains it.
  pub fn failed_code(&self) -> Option<i32> {
    match (self.producer.success(), self.consumer.success()) {
      (true, true) => None,
      (false, false) if self.producer.code.is_none() => self.consumer.code,
      (false, _) => self.producer.code,
      (true, false) => self.consumer.code,
    }
  }
}
