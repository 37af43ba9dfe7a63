//! Error types for couchdb-release-check with contextual messages and exit codes
//!
//! Every failure that ends a run is a `VerifyError`. The category decides the
//! process exit code, so scripts driving the tool can tell a checksum mismatch
//! from a missing executable without scraping the console.

use crate::pipeline::Stage;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for couchdb-release-check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, input)
  User = 1,
  /// System error (I/O, process spawn)
  System = 2,
  /// A required executable is not on PATH
  MissingTool = 3,
  /// Importing the release signing keys failed
  Keyring = 4,
  /// Published checksum did not match the artifact
  Checksum = 5,
  /// Clone, tree export or unpack failed
  SourceTree = 6,
  /// configure failed
  Build = 7,
  /// A reporting stage promoted to gating failed
  Review = 8,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for couchdb-release-check
#[derive(Debug)]
pub enum VerifyError {
  /// Configuration errors
  Config(ConfigError),

  /// External tool resolution/spawn errors
  Tool(ToolError),

  /// A gating stage failed
  Gate(GateError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl VerifyError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    VerifyError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    VerifyError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      VerifyError::Message { message, context, help } => VerifyError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      VerifyError::Io(e) => VerifyError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", e)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      VerifyError::Config(_) => ExitCode::User,
      VerifyError::Tool(ToolError::Missing { .. }) => ExitCode::MissingTool,
      VerifyError::Tool(ToolError::SpawnFailed { .. }) => ExitCode::System,
      VerifyError::Gate(e) => e.stage.exit_code(),
      VerifyError::Io(_) => ExitCode::System,
      VerifyError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      VerifyError::Config(e) => e.help_message(),
      VerifyError::Tool(e) => e.help_message(),
      VerifyError::Gate(e) => e.help_message(),
      VerifyError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for VerifyError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VerifyError::Config(e) => write!(f, "{}", e),
      VerifyError::Tool(e) => write!(f, "{}", e),
      VerifyError::Gate(e) => write!(f, "{}", e),
      VerifyError::Io(e) => write!(f, "I/O error: {}", e),
      VerifyError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for VerifyError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      VerifyError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for VerifyError {
  fn from(err: io::Error) -> Self {
    VerifyError::Io(err)
  }
}

impl From<String> for VerifyError {
  fn from(msg: String) -> Self {
    VerifyError::message(msg)
  }
}

impl From<&str> for VerifyError {
  fn from(msg: &str) -> Self {
    VerifyError::message(msg)
  }
}

impl From<toml_edit::de::Error> for VerifyError {
  fn from(err: toml_edit::de::Error) -> Self {
    VerifyError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for VerifyError {
  fn from(err: serde_json::Error) -> Self {
    VerifyError::message(format!("JSON error: {}", err))
  }
}

impl From<anyhow::Error> for VerifyError {
  fn from(err: anyhow::Error) -> Self {
    VerifyError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// An explicitly requested config file does not exist
  NotFound { path: PathBuf },

  /// A field has an unusable value
  Invalid { field: String, reason: String },

  /// `policy.strict` names a stage that does not exist
  UnknownStage { name: String },

  /// `policy.strict` names a stage that already gates
  NotPromotable { stage: Stage },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Pass an existing file to --config, or drop the flag to use built-in defaults.".to_string())
      }
      ConfigError::UnknownStage { .. } | ConfigError::NotPromotable { .. } => Some(format!(
        "Only reporting stages can be listed in policy.strict: {}",
        Stage::promotable()
          .map(|s| s.id())
          .collect::<Vec<_>>()
          .join(", ")
      )),
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
      ConfigError::Invalid { field, reason } => {
        write!(f, "Invalid value for {}: {}", field, reason)
      }
      ConfigError::UnknownStage { name } => {
        write!(f, "Unknown stage '{}' in policy.strict", name)
      }
      ConfigError::NotPromotable { stage } => {
        write!(f, "Stage '{}' already gates the run and cannot be listed in policy.strict", stage)
      }
    }
  }
}

/// External tool errors
#[derive(Debug)]
pub enum ToolError {
  /// Executable not found on PATH
  Missing {
    program: String,
    message: String,
    hint: Option<String>,
  },

  /// Executable found but the process could not be started
  SpawnFailed { command: String, reason: String },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Missing { hint, program, .. } => Some(
        hint
          .clone()
          .unwrap_or_else(|| format!("Install '{}' or point [tools] in the config at it.", program)),
      ),
      ToolError::SpawnFailed { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Missing { message, .. } => write!(f, "{}", message),
      ToolError::SpawnFailed { command, reason } => {
        write!(f, "Failed to execute `{}`: {}", command, reason)
      }
    }
  }
}

/// A gating stage reported failure
#[derive(Debug)]
pub struct GateError {
  pub stage: Stage,
  pub message: String,
  /// Exit status of the failing command, if one ran
  pub status: Option<i32>,
}

impl GateError {
  fn help_message(&self) -> Option<String> {
    let help = match self.stage {
      Stage::ImportKeys => "Check network access to the KEYS URL and that gpg can write to its keyring.",
      Stage::Checksum => "The artifact does not match its published digest. Re-download, or report the candidate as broken.",
      Stage::Clone => "Check network access to the repository URL in [release].repository_url.",
      Stage::ExportTree => "Make sure <artifact>.ish sits next to the tarball in dist/ and names a tree in the repository.",
      Stage::Unpack => "The tarball may be truncated; check the download output above.",
      Stage::Configure => "Install the build dependencies listed at the start of the run and retry.",
      Stage::Download | Stage::Signature | Stage::Diff | Stage::Test | Stage::Package => {
        "This stage is gating because it is listed in policy.strict."
      }
      _ => return None,
    };
    Some(help.to_string())
  }
}

impl fmt::Display for GateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message)?;
    if let Some(code) = self.status {
      write!(f, " (exit status {})", code)?;
    }
    Ok(())
  }
}

/// Result type alias for couchdb-release-check
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> VerifyResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> VerifyResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<VerifyError>,
{
  fn context(self, ctx: impl Into<String>) -> VerifyResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> VerifyResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &VerifyError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
