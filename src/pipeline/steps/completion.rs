//! Final instructions for starting the built release

use crate::core::error::VerifyResult;
use crate::pipeline::context::RunContext;
use crate::pipeline::outcome::StageOutcome;
use crate::ui::Console;

pub const FAREWELL: &str = "That's it. Bye!";

pub fn run(ctx: &RunContext<'_>, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  let paths = ctx.install_paths();

  console.say(format!(
    "you now have to set up an admin user / password in {}",
    paths.local_ini.display()
  ))?;
  console.say(format!(
    "if done, you can start CouchDB with: {}",
    paths.start_command.display()
  ))?;
  console.banner()?;
  console.say(FAREWELL)?;
  console.banner()?;

  Ok(StageOutcome::pass(format!(
    "{} is ready to start",
    ctx.identity.source_dir_name()
  )))
}
