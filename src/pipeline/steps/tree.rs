//! Reference tree reconstruction and comparison
//!
//! The tarball is supposed to be `git archive` of a known tree plus generated
//! files. The tree id travels in `<artifact>.ish`; exporting that tree and
//! diffing it against the unpacked tarball shows exactly what was added.

use crate::core::error::{ResultExt, VerifyResult};
use crate::pipeline::context::RunContext;
use crate::pipeline::outcome::StageOutcome;
use crate::process::{CommandRunner, OutputMode, ToolCommand};
use crate::ui::Console;
use std::fs;

/// `git clone <repository_url> <root>/git`
pub fn clone_command(ctx: &RunContext<'_>) -> ToolCommand {
  ToolCommand::new(&ctx.config.tools.vcs)
    .arg("clone")
    .arg(&ctx.config.release.repository_url)
    .path_arg(&ctx.area.git())
}

/// `git archive <tree-ish>` in the clone piped into `tar -xf - -C <root>/tree`
pub fn export_commands(ctx: &RunContext<'_>, tree_ish: &str) -> (ToolCommand, ToolCommand) {
  let archive = ToolCommand::new(&ctx.config.tools.vcs)
    .args(["archive", "--format=tar"])
    .arg(tree_ish)
    .current_dir(ctx.area.git());
  let extract = ToolCommand::new(&ctx.config.tools.archive)
    .args(["-xf", "-", "-C"])
    .path_arg(&ctx.area.tree());
  (archive, extract)
}

/// `tar -xzf <artifact>` inside dist/
pub fn unpack_command(ctx: &RunContext<'_>) -> ToolCommand {
  ToolCommand::new(&ctx.config.tools.archive)
    .arg("-xzf")
    .arg(ctx.identity.artifact_filename())
    .current_dir(ctx.area.dist())
}

/// `diff -r <dist>/<source dir> <root>/tree`
pub fn diff_command(ctx: &RunContext<'_>) -> ToolCommand {
  ToolCommand::new(&ctx.config.tools.diff)
    .arg("-r")
    .path_arg(&ctx.source_dir())
    .path_arg(&ctx.area.tree())
    .current_dir(ctx.area.dist())
}

pub fn clone(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  console.say("Make a pristine copy from the tree-ish")?;

  let outcome = runner.run(&clone_command(ctx), OutputMode::Quiet)?;
  if outcome.success() {
    console.success(format!("git clone of CouchDB finished into {}", ctx.area.git().display()))?;
    Ok(StageOutcome::pass("git clone of CouchDB finished"))
  } else {
    Ok(StageOutcome::fail("git clone of CouchDB did not succeed", outcome.code))
  }
}

/// Tree id from the `.ish` sidecar, or the outcome explaining why there is none
pub fn read_tree_ish(ctx: &RunContext<'_>) -> VerifyResult<Result<String, StageOutcome>> {
  let path = ctx.tree_ish_path();
  if !path.is_file() {
    return Ok(Err(StageOutcome::fail(
      format!("tree-ish file {} not found", path.display()),
      None,
    )));
  }

  let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
  let tree_ish = content.trim();
  if tree_ish.is_empty() {
    return Ok(Err(StageOutcome::fail(
      format!("tree-ish file {} is empty", path.display()),
      None,
    )));
  }

  Ok(Ok(tree_ish.to_string()))
}

pub fn export(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  console.say("use git archive to create the tree-ish")?;

  let tree_ish = match read_tree_ish(ctx)? {
    Ok(tree_ish) => tree_ish,
    Err(outcome) => return Ok(outcome),
  };
  tracing::info!(%tree_ish, "exporting reference tree");

  let (archive, extract) = export_commands(ctx, &tree_ish);
  let outcome = runner.run_piped(&archive, &extract)?;
  if outcome.success() {
    console.success(format!("git archive of {} finished", tree_ish))?;
    Ok(StageOutcome::pass("git archive finished"))
  } else {
    Ok(StageOutcome::fail("git archive did not succeed", outcome.failed_code()))
  }
}

pub fn unpack(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  console.say("unpacking the tarball")?;

  let outcome = runner.run(&unpack_command(ctx), OutputMode::Quiet)?;
  if !outcome.success() {
    return Ok(StageOutcome::fail("unpacking tarball did not succeed", outcome.code));
  }

  let source_dir = ctx.source_dir();
  if !source_dir.is_dir() {
    return Ok(StageOutcome::fail(
      format!("tarball did not unpack into {}", source_dir.display()),
      outcome.code,
    ));
  }

  console.success("unpacking tarball finished")?;
  Ok(StageOutcome::pass("unpacking tarball finished"))
}

/// Output goes straight to the terminal; any exit status is only reported
pub fn diff(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  console.say(format!(
    "diff between {} and the reference tree",
    ctx.identity.source_dir_name()
  ))?;

  let outcome = runner.run(&diff_command(ctx), OutputMode::Inherit)?;
  console.say("diff finished")?;

  match outcome.code {
    Some(0) => Ok(StageOutcome::pass("tarball matches the reference tree")),
    Some(1) => Ok(StageOutcome::fail(
      "tarball and reference tree differ; review the diff above",
      outcome.code,
    )),
    code => Ok(StageOutcome::fail("diff could not compare the trees", code)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::VerifyConfig;
  use crate::core::work_area::WorkArea;
  use crate::process::fake::FakeRunner;
  use crate::release::ReleaseIdentity;

  fn context<'a>(config: &'a VerifyConfig, area: &'a WorkArea) -> RunContext<'a> {
    RunContext::new(config, area, ReleaseIdentity::new("3.1.1", "rc.1", "apache-couchdb"))
  }

  #[test]
  fn test_command_shapes() {
    let config = VerifyConfig::default();
    let area = WorkArea::new("/w");
    let ctx = context(&config, &area);

    assert_eq!(
      clone_command(&ctx).to_string(),
      "git clone https://gitbox.apache.org/repos/asf/couchdb.git /w/git"
    );

    let (archive, extract) = export_commands(&ctx, "4a5b6c");
    assert_eq!(archive.to_string(), "git archive --format=tar 4a5b6c");
    assert_eq!(archive.cwd, Some(area.git()));
    assert_eq!(extract.to_string(), "tar -xf - -C /w/tree");

    assert_eq!(unpack_command(&ctx).to_string(), "tar -xzf apache-couchdb-3.1.1-RC1.tar.gz");
    assert_eq!(diff_command(&ctx).to_string(), "diff -r /w/dist/apache-couchdb-3.1.1 /w/tree");
  }

  #[test]
  fn test_missing_tree_ish_fails_without_running_git() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = VerifyConfig::default();
    let area = WorkArea::new(temp.path());
    area.reset().unwrap();
    let runner = FakeRunner::new();
    let mut out = Vec::new();
    let mut console = Console::new(&mut out);

    let outcome = export(&context(&config, &area), &runner, &mut console).unwrap();
    assert!(!outcome.passed);
    assert!(outcome.message.contains("not found"));
    assert!(runner.calls().is_empty());
  }

  #[test]
  fn test_tree_ish_is_trimmed() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = VerifyConfig::default();
    let area = WorkArea::new(temp.path());
    area.reset().unwrap();
    let ctx = context(&config, &area);
    fs::write(ctx.tree_ish_path(), "  0123abcd\n").unwrap();

    let runner = FakeRunner::new();
    let mut out = Vec::new();
    let mut console = Console::new(&mut out);
    let outcome = export(&ctx, &runner, &mut console).unwrap();

    assert!(outcome.passed);
    assert_eq!(
      runner.calls(),
      vec![
        "git archive --format=tar 0123abcd".to_string(),
        format!("tar -xf - -C {}", area.tree().display()),
      ]
    );
  }

  #[test]
  fn test_unpack_requires_source_dir() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = VerifyConfig::default();
    let area = WorkArea::new(temp.path());
    area.reset().unwrap();
    let runner = FakeRunner::new();
    let mut out = Vec::new();
    let mut console = Console::new(&mut out);

    let outcome = unpack(&context(&config, &area), &runner, &mut console).unwrap();
    assert!(!outcome.passed);
    assert!(outcome.message.starts_with("tarball did not unpack into"));
  }

  #[test]
  fn test_diff_exit_statuses() {
    let config = VerifyConfig::default();
    let area = WorkArea::new("/w");
    let mut out = Vec::new();
    let mut console = Console::new(&mut out);

    let same = diff(&context(&config, &area), &FakeRunner::new(), &mut console).unwrap();
    assert!(same.passed);

    let differs = diff(&context(&config, &area), &FakeRunner::new().exit("diff", 1), &mut console).unwrap();
    assert!(!differs.passed);
    assert!(differs.message.contains("differ"));

    let trouble = diff(&context(&config, &area), &FakeRunner::new().exit("diff", 2), &mut console).unwrap();
    assert_eq!(trouble.code, Some(2));
  }
}
