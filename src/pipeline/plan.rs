//! Dry-run view of a verification run
//!
//! Built from the same command builders the stages use, so what `plan` prints
//! is what `verify` would spawn. The only value not known up front is the
//! tree id, which lives in the `.ish` sidecar that has not been downloaded
//! yet; a placeholder stands in for it.

use super::context::RunContext;
use super::stage::{GatePolicy, Stage};
use super::steps::{build, checksum, download, signature, tree};
use crate::checks::tool_checks;
use crate::core::error::VerifyResult;
use crate::process::ToolCommand;
use crate::release::ReleaseIdentity;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// Plan identifier (SHA256 hash of the planned commands)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanId(String);

impl PlanId {
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    Self(format!("{:x}", hasher.finalize()))
  }

  /// First 12 characters
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// Something a stage will spawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlannedCommand {
  Single { command: ToolCommand },
  Piped { producer: ToolCommand, consumer: ToolCommand },
}

impl fmt::Display for PlannedCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (text, cwd) = match self {
      PlannedCommand::Single { command } => (command.to_string(), &command.cwd),
      PlannedCommand::Piped { producer, consumer } => (format!("{} | {}", producer, consumer), &producer.cwd),
    };
    write!(f, "{}", text)?;
    if let Some(dir) = cwd {
      write!(f, "  (in {})", dir.display())?;
    }
    Ok(())
  }
}

impl From<ToolCommand> for PlannedCommand {
  fn from(command: ToolCommand) -> Self {
    PlannedCommand::Single { command }
  }
}

impl From<(ToolCommand, ToolCommand)> for PlannedCommand {
  fn from((producer, consumer): (ToolCommand, ToolCommand)) -> Self {
    PlannedCommand::Piped { producer, consumer }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
  pub stage: Stage,
  pub policy: GatePolicy,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub commands: Vec<PlannedCommand>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

impl PlannedStep {
  fn new(stage: Stage, policy: GatePolicy) -> Self {
    Self {
      stage,
      policy,
      commands: Vec::new(),
      note: None,
    }
  }

  fn command(mut self, command: impl Into<PlannedCommand>) -> Self {
    self.commands.push(command.into());
    self
  }

  fn note(mut self, note: impl Into<String>) -> Self {
    self.note = Some(note.into());
    self
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan {
  pub id: PlanId,
  pub identity: ReleaseIdentity,
  pub artifact: String,
  pub url: String,
  pub work_root: PathBuf,
  pub report: PathBuf,
  pub steps: Vec<PlannedStep>,
}

impl ExecutionPlan {
  pub fn build(ctx: &RunContext<'_>) -> Self {
    let policy = |stage: Stage| ctx.config.policy.policy_for(stage);
    let placeholder = format!("<{}>", ctx.identity.tree_ish_filename());

    let programs: Vec<String> = tool_checks(&ctx.config.tools)
      .iter()
      .map(|check| check.program().to_string())
      .collect();

    let mut steps = Vec::with_capacity(Stage::ALL.len());
    for stage in Stage::ALL {
      let step = PlannedStep::new(stage, policy(stage));
      let step = match stage {
        Stage::Preflight => step.note(format!("resolve on PATH: {}", programs.join(", "))),
        Stage::Identity => step.note(format!(
          "version {}, candidate {}",
          ctx.identity.version, ctx.identity.candidate
        )),
        Stage::ResetWorkArea => step.note(format!(
          "remove {} and create dist, git, tree",
          ctx.area.root().display()
        )),
        Stage::Download => download::commands(ctx)
          .into_iter()
          .fold(step, |step, cmd| step.command(cmd)),
        Stage::ImportKeys => step.command(signature::import_commands(ctx)),
        Stage::Signature => step.command(signature::verify_command(ctx)),
        Stage::Checksum => checksum::commands(ctx)
          .into_iter()
          .fold(step, |step, (_, cmd)| step.command(cmd)),
        Stage::Clone => step.command(tree::clone_command(ctx)),
        Stage::ExportTree => step.command(tree::export_commands(ctx, &placeholder)),
        Stage::Unpack => step.command(tree::unpack_command(ctx)),
        Stage::Diff => step.command(tree::diff_command(ctx)),
        Stage::Configure => step.command(build::configure_command(ctx)),
        Stage::Test => step.command(build::make_command(ctx, "check")),
        Stage::Package => step.command(build::make_command(ctx, "release")),
        Stage::Completion => step.note(format!(
          "print start instructions for {}",
          ctx.install_paths().start_command.display()
        )),
      };
      steps.push(step);
    }

    let id = PlanId::from_contents(&serde_json::to_vec(&steps).unwrap_or_default());

    Self {
      id,
      identity: ctx.identity.clone(),
      artifact: ctx.identity.artifact_filename(),
      url: ctx.identity.artifact_url(&ctx.config.release.base_url),
      work_root: ctx.area.root().to_path_buf(),
      report: ctx.area.report_path(),
      steps,
    }
  }

  pub fn to_json(&self) -> VerifyResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("📋 Verification plan ({})\n", self.id));
    output.push_str(&format!("   Release:   {}\n", self.artifact));
    output.push_str(&format!("   URL:       {}\n", self.url));
    output.push_str(&format!("   Work root: {}\n", self.work_root.display()));

    output.push_str(&format!("\n   Stages ({}):\n", self.steps.len()));
    for (i, step) in self.steps.iter().enumerate() {
      output.push_str(&format!("   {:>2}. {} [{}]\n", i + 1, step.stage, step.policy));
      if let Some(note) = &step.note {
        output.push_str(&format!("       {}\n", note));
      }
      for command in &step.commands {
        output.push_str(&format!("       $ {}\n", command));
      }
    }

    output
  }
}
