mod checks;
mod commands;
mod core;
mod logging;
mod pipeline;
mod process;
mod release;
mod ui;

use clap::{Parser, Subcommand};
use core::error::{VerifyError, print_error};
use std::path::PathBuf;

/// Download, verify, rebuild and test an Apache CouchDB release candidate
#[derive(Parser)]
#[command(name = "couchdb-release-check")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Config file (default: release-check.toml in the current directory, if present)
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Log spawned commands and stage transitions to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the full verification of a release candidate
  Verify {
    /// Release version, e.g. 3.1.1 (prompted for when omitted)
    #[arg(long)]
    release_version: Option<String>,
    /// Release candidate label, e.g. rc.1 (prompted for when omitted)
    #[arg(long)]
    candidate: Option<String>,
    /// Scratch directory; deleted and recreated on every run
    #[arg(long, value_name = "PATH")]
    work_root: Option<PathBuf>,
    /// Do not write verification-report.json
    #[arg(long)]
    no_report: bool,
  },

  /// Show every command a verify run would execute, without executing any
  Plan {
    /// Release version, e.g. 3.1.1
    #[arg(long)]
    release_version: String,
    /// Release candidate label, e.g. rc.1
    #[arg(long)]
    candidate: String,
    /// Output the plan in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Check that every required executable is installed
  Doctor {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  logging::init_logging(cli.verbose);

  let config = cli.config.as_deref();
  let result = match cli.command {
    Commands::Verify {
      release_version,
      candidate,
      work_root,
      no_report,
    } => commands::run_verify(
      config,
      commands::VerifyArgs {
        release_version,
        candidate,
        work_root,
        no_report,
      },
    ),
    Commands::Plan {
      release_version,
      candidate,
      json,
    } => commands::run_plan(config, &release_version, &candidate, json),
    Commands::Doctor { json } => commands::run_doctor(config, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: VerifyError) -> ! {
  tracing::debug!(error = ?err, "run failed");
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
