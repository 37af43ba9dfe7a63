//! Tests for the `doctor` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_doctor_with_empty_path_reports_missing_tools() -> Result<()> {
  let env = TestEnv::new()?;
  let output = env.run_with_path(&["doctor"], "")?;

  assert_eq!(output.status.code(), Some(3));
  let text = stdout(&output);
  assert!(text.contains("❌ Erlang is not installed!"));
  assert!(text.contains("brew install coreutils"));
  assert!(stderr(&output).contains("Erlang is not installed!"));

  Ok(())
}

#[test]
fn test_doctor_passes_with_all_tools() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_noop_tools()?;

  let output = env.run_with_path(&["doctor"], &env.bin.display().to_string())?;
  expect_success(&output)?;
  assert!(stdout(&output).contains("✅ wget is installed"));

  Ok(())
}

#[test]
fn test_doctor_json() -> Result<()> {
  let env = TestEnv::new()?;
  env.install_noop_tools()?;
  std::fs::remove_file(env.bin.join("gpg"))?;

  let output = env.run_with_path(&["doctor", "--json"], &env.bin.display().to_string())?;
  assert_eq!(output.status.code(), Some(3));

  let results: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let failed: Vec<&str> = results
    .as_array()
    .unwrap()
    .iter()
    .filter(|r| r["passed"] == false && r["severity"] == "Error")
    .map(|r| r["check_name"].as_str().unwrap())
    .collect();
  assert_eq!(failed, vec!["tool-signature"]);

  Ok(())
}
