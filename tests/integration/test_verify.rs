//! Tests for the `verify` command

use crate::helpers::*;
use anyhow::Result;

const FLAGS: [&str; 4] = ["--release-version", "3.1.1", "--candidate", "rc.1"];

fn verify_args<'a>(env_root: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
  let mut args = vec!["verify", "--work-root", env_root];
  args.extend_from_slice(extra);
  args
}

#[test]
fn test_missing_tool_aborts_before_touching_work_root() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_tool("erl", "exit 0")?;
  let root = env.work_root_arg();

  let output = env.run_with_path(&verify_args(&root, &FLAGS), &env.bin.display().to_string())?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("wget is not installed. Aborting. Please install wget"));
  assert!(!env.work_root.exists());

  Ok(())
}

#[test]
fn test_work_root_resolving_to_filesystem_root_is_refused() -> Result<()> {
  // No tools installed: even if the root slipped through, preflight stops before reset
  let env = TestEnv::new()?;

  let output = env.run(&verify_args("/tmp/..", &FLAGS))?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("cannot be used as a scratch root"));

  Ok(())
}

#[test]
fn test_full_run_reaches_completion_once() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_release_tools()?;
  let root = env.work_root_arg();

  let output = env.run(&verify_args(&root, &FLAGS))?;
  expect_success(&output)?;

  let text = stdout(&output);
  assert_eq!(text.matches("That's it. Bye!").count(), 1);
  assert!(text.contains("the sha256sum is correct"));
  assert!(text.contains("the sha512sum is correct"));
  assert!(text.contains(&format!(
    "{}/dist/apache-couchdb-3.1.1/rel/couchdb/etc/local.ini",
    root
  )));

  let report = env.report()?;
  let stages = report["stages"].as_array().unwrap();
  assert_eq!(stages.len(), 15);
  assert!(stages.iter().all(|s| s["status"] == "passed"));
  assert_eq!(report["artifact_sha256"].as_str().map(str::len), Some(64));
  assert!(report.get("error").is_none());

  Ok(())
}

#[test]
fn test_prompts_read_identity_from_stdin() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_release_tools()?;
  let root = env.work_root_arg();

  let output = env.run_with_input(&verify_args(&root, &[]), "3.1.1\nrc.1\n")?;
  expect_success(&output)?;

  let text = stdout(&output);
  assert!(text.contains("Provide the couchdb release version: "));
  assert!(text.contains("Provide the couchdb release candidate: "));
  assert_eq!(env.report()?["release"]["artifact"], "apache-couchdb-3.1.1-RC1.tar.gz");

  Ok(())
}

#[test]
fn test_closed_stdin_is_user_error() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_noop_tools()?;
  let root = env.work_root_arg();

  let output = env.run(&verify_args(&root, &[]))?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--release-version"));
  assert!(!env.work_root.exists());

  Ok(())
}

#[test]
fn test_missing_sidecar_fails_export_and_is_reported() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_noop_tools()?;
  let root = env.work_root_arg();

  let output = env.run(&verify_args(&root, &FLAGS))?;
  assert_eq!(output.status.code(), Some(6));
  assert!(!stdout(&output).contains("That's it. Bye!"));

  let report = env.report()?;
  assert_eq!(report["error"]["exit_code"], 6);
  let last = report["stages"].as_array().unwrap().last().unwrap().clone();
  assert_eq!(last["stage"], "export-tree");
  assert_eq!(last["status"], "failed");

  Ok(())
}

#[test]
fn test_checksum_mismatch_exits_with_checksum_code() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_release_tools()?;
  env.install_tool("sha512sum", "exit 1")?;
  let root = env.work_root_arg();

  let output = env.run(&verify_args(&root, &FLAGS))?;
  assert_eq!(output.status.code(), Some(5));
  assert!(stdout(&output).contains("the sha512sum is incorrect"));
  assert!(!env.work_root.join("dist").join("apache-couchdb-3.1.1").exists());

  let report = env.report()?;
  let last = report["stages"].as_array().unwrap().last().unwrap().clone();
  assert_eq!(last["stage"], "checksum");
  assert!(report.get("artifact_sha256").is_none());

  Ok(())
}

#[test]
fn test_no_report_flag() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_release_tools()?;
  let root = env.work_root_arg();

  let output = env.run(&verify_args(&root, &["--release-version", "3.1.1", "--candidate", "rc.1", "--no-report"]))?;
  expect_success(&output)?;
  assert!(!env.work_root.join("verification-report.json").exists());

  Ok(())
}
