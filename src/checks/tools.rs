//! Required executable checks

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::ToolsConfig;
use crate::core::error::{ToolError, VerifyError, VerifyResult};
use serde_json::json;

const COREUTILS_HINT: &str = "Install coreutils. On Mac with: brew install coreutils\n\
  Afterwards, you may need to also do this:\n\
  sudo ln -s /usr/local/bin/gsha256sum /usr/local/bin/sha256sum\n\
  sudo ln -s /usr/local/bin/gsha512sum /usr/local/bin/sha512sum";

/// What an external executable is needed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRole {
  Toolchain,
  Download,
  Fetch,
  Signature,
  Sha256,
  Sha512,
  Vcs,
  Archive,
  Diff,
  Make,
}

impl ToolRole {
  pub const ALL: [ToolRole; 10] = [
    ToolRole::Toolchain,
    ToolRole::Download,
    ToolRole::Fetch,
    ToolRole::Signature,
    ToolRole::Sha256,
    ToolRole::Sha512,
    ToolRole::Vcs,
    ToolRole::Archive,
    ToolRole::Diff,
    ToolRole::Make,
  ];

  /// Check name, `tool-<role>`
  pub fn check_name(self) -> &'static str {
    match self {
      ToolRole::Toolchain => "tool-toolchain",
      ToolRole::Download => "tool-download",
      ToolRole::Fetch => "tool-fetch",
      ToolRole::Signature => "tool-signature",
      ToolRole::Sha256 => "tool-sha256",
      ToolRole::Sha512 => "tool-sha512",
      ToolRole::Vcs => "tool-vcs",
      ToolRole::Archive => "tool-archive",
      ToolRole::Diff => "tool-diff",
      ToolRole::Make => "tool-make",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      ToolRole::Toolchain => "Erlang runtime the release is built with",
      ToolRole::Download => "Download client for release artifacts",
      ToolRole::Fetch => "HTTP client for the signing keyring",
      ToolRole::Signature => "OpenPGP tool for signature verification",
      ToolRole::Sha256 => "SHA-256 checksum tool",
      ToolRole::Sha512 => "SHA-512 checksum tool",
      ToolRole::Vcs => "git client for the reference tree",
      ToolRole::Archive => "tar for exporting and unpacking sources",
      ToolRole::Diff => "diff for comparing tarball and reference tree",
      ToolRole::Make => "make for the test and release targets",
    }
  }

  /// Configured program for this role
  pub fn program(self, tools: &ToolsConfig) -> &str {
    match self {
      ToolRole::Toolchain => &tools.toolchain,
      ToolRole::Download => &tools.download,
      ToolRole::Fetch => &tools.fetch,
      ToolRole::Signature => &tools.signature,
      ToolRole::Sha256 => &tools.sha256,
      ToolRole::Sha512 => &tools.sha512,
      ToolRole::Vcs => &tools.vcs,
      ToolRole::Archive => &tools.archive,
      ToolRole::Diff => &tools.diff,
      ToolRole::Make => &tools.make,
    }
  }

  fn missing_message(self, program: &str) -> String {
    match self {
      ToolRole::Toolchain if program == "erl" => "Erlang is not installed!".to_string(),
      ToolRole::Download => format!("{} is not installed. Aborting. Please install {}", program, program),
      _ => format!("{} is not installed.", program),
    }
  }

  fn hint(self) -> Option<&'static str> {
    match self {
      ToolRole::Sha256 | ToolRole::Sha512 => Some(COREUTILS_HINT),
      ToolRole::Toolchain => Some("Install Erlang/OTP (package `erlang`) and make sure `erl` is on PATH."),
      _ => None,
    }
  }
}

/// Verifies one executable resolves on PATH
pub struct ToolCheck {
  role: ToolRole,
  program: String,
}

impl ToolCheck {
  pub fn new(role: ToolRole, tools: &ToolsConfig) -> Self {
    Self {
      role,
      program: role.program(tools).to_string(),
    }
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  /// The error preflight raises when this tool is missing
  pub fn missing_error(&self) -> VerifyError {
    VerifyError::Tool(ToolError::Missing {
      program: self.program.clone(),
      message: self.role.missing_message(&self.program),
      hint: self.role.hint().map(str::to_string),
    })
  }
}

impl Check for ToolCheck {
  fn name(&self) -> &str {
    self.role.check_name()
  }

  fn description(&self) -> &str {
    self.role.description()
  }

  fn run(&self, ctx: &CheckContext<'_>) -> VerifyResult<CheckResult> {
    match ctx.runner.locate(&self.program) {
      Some(path) => Ok(
        CheckResult::pass(self.name(), format!("{} is installed", self.program))
          .with_details(json!({ "program": self.program, "path": path })),
      ),
      None => Ok(
        CheckResult::error(self.name(), self.role.missing_message(&self.program), self.role.hint())
          .with_details(json!({ "program": self.program })),
      ),
    }
  }
}
