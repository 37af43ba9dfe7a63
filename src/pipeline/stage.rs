//! Stage identifiers and their gate policies

use crate::core::error::ExitCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a failing stage stops the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePolicy {
  /// Nonzero exit aborts the run
  Gating,
  /// Outcome is surfaced to the operator; the run continues
  Reporting,
}

impl fmt::Display for GatePolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GatePolicy::Gating => write!(f, "gating"),
      GatePolicy::Reporting => write!(f, "reporting"),
    }
  }
}

/// One step of the verification run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
  Preflight,
  Identity,
  ResetWorkArea,
  Download,
  ImportKeys,
  Signature,
  Checksum,
  Clone,
  ExportTree,
  Unpack,
  Diff,
  Configure,
  Test,
  Package,
  Completion,
}

impl Stage {
  /// Every stage in the order the pipeline runs them
  pub const ALL: [Stage; 15] = [
    Stage::Preflight,
    Stage::Identity,
    Stage::ResetWorkArea,
    Stage::Download,
    Stage::ImportKeys,
    Stage::Signature,
    Stage::Checksum,
    Stage::Clone,
    Stage::ExportTree,
    Stage::Unpack,
    Stage::Diff,
    Stage::Configure,
    Stage::Test,
    Stage::Package,
    Stage::Completion,
  ];

  /// Stable kebab-case id used in config and reports
  pub fn id(self) -> &'static str {
    match self {
      Stage::Preflight => "preflight",
      Stage::Identity => "identity",
      Stage::ResetWorkArea => "reset-work-area",
      Stage::Download => "download",
      Stage::ImportKeys => "import-keys",
      Stage::Signature => "signature",
      Stage::Checksum => "checksum",
      Stage::Clone => "clone",
      Stage::ExportTree => "export-tree",
      Stage::Unpack => "unpack",
      Stage::Diff => "diff",
      Stage::Configure => "configure",
      Stage::Test => "test",
      Stage::Package => "package",
      Stage::Completion => "completion",
    }
  }

  /// Policy before any `policy.strict` promotion.
  ///
  /// Signature, diff, test and package results need a human to judge them;
  /// downloads are checked indirectly by the checksum gate.
  pub fn default_policy(self) -> GatePolicy {
    match self {
      Stage::Download | Stage::Signature | Stage::Diff | Stage::Test | Stage::Package => GatePolicy::Reporting,
      _ => GatePolicy::Gating,
    }
  }

  /// Stages that `policy.strict` may promote to gating
  pub fn promotable() -> impl Iterator<Item = Stage> {
    Stage::ALL
      .into_iter()
      .filter(|s| s.default_policy() == GatePolicy::Reporting)
  }

  /// Exit code used when this stage ends the run
  pub fn exit_code(self) -> ExitCode {
    match self {
      Stage::Preflight => ExitCode::MissingTool,
      Stage::Identity => ExitCode::User,
      Stage::ResetWorkArea | Stage::Completion => ExitCode::System,
      Stage::ImportKeys => ExitCode::Keyring,
      Stage::Checksum => ExitCode::Checksum,
      Stage::Clone | Stage::ExportTree | Stage::Unpack => ExitCode::SourceTree,
      Stage::Configure => ExitCode::Build,
      Stage::Download | Stage::Signature | Stage::Diff | Stage::Test | Stage::Package => ExitCode::Review,
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.id())
  }
}

impl FromStr for Stage {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Stage::ALL
      .into_iter()
      .find(|stage| stage.id() == s)
      .ok_or_else(|| s.to_string())
  }
}
