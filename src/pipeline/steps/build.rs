//! Configure, test and package the unpacked tarball

use crate::core::error::{ToolError, VerifyError, VerifyResult};
use crate::pipeline::context::RunContext;
use crate::pipeline::outcome::StageOutcome;
use crate::process::{CommandRunner, OutputMode, ToolCommand};
use crate::ui::Console;

/// `./configure -c` inside the unpacked directory
pub fn configure_command(ctx: &RunContext<'_>) -> ToolCommand {
  ToolCommand::new("./configure")
    .arg("-c")
    .current_dir(ctx.source_dir())
}

/// `make <target>` inside the unpacked directory
pub fn make_command(ctx: &RunContext<'_>, target: &str) -> ToolCommand {
  ToolCommand::new(&ctx.config.tools.make)
    .arg(target)
    .current_dir(ctx.source_dir())
}

pub fn configure(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  console.say("running configure")?;

  let outcome = match runner.run(&configure_command(ctx), OutputMode::Inherit) {
    Ok(outcome) => outcome,
    // Tarball shipped without ./configure
    Err(VerifyError::Tool(ToolError::SpawnFailed { command, reason })) => {
      tracing::debug!(%command, %reason, "configure could not be started");
      console.failure(format!("could not run {}: {}", command, reason))?;
      return Ok(StageOutcome::fail("configure did not succeed", None));
    }
    Err(e) => return Err(e),
  };

  if outcome.success() {
    console.success("running configure finished")?;
    Ok(StageOutcome::pass("running configure finished"))
  } else {
    Ok(StageOutcome::fail("configure did not succeed", outcome.code))
  }
}

pub fn test(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  make(ctx, runner, console, "check")
}

pub fn package(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  make(ctx, runner, console, "release")
}

fn make(
  ctx: &RunContext<'_>,
  runner: &dyn CommandRunner,
  console: &mut Console<'_>,
  target: &str,
) -> VerifyResult<StageOutcome> {
  console.say(format!("running make {}", target))?;

  let outcome = runner.run(&make_command(ctx, target), OutputMode::Inherit)?;
  if outcome.success() {
    console.success(format!("make {} finished", target))?;
    Ok(StageOutcome::pass(format!("make {} finished", target)))
  } else {
    Ok(StageOutcome::fail(format!("make {} did not succeed", target), outcome.code))
  }
}
