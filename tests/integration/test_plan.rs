//! Tests for the `plan` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_plan_prints_derived_names_and_commands() -> Result<()> {
  let env = TestEnv::new()?;
  let output = env.run(&["plan", "--release-version", "3.1.1", "--candidate", "rc.1"])?;
  expect_success(&output)?;

  let text = stdout(&output);
  assert!(text.contains("apache-couchdb-3.1.1-RC1.tar.gz"));
  assert!(
    text.contains("https://dist.apache.org/repos/dist/dev/couchdb/source/3.1.1/rc.1/apache-couchdb-3.1.1-RC1.tar.gz")
  );
  assert!(text.contains("checksum [gating]"));
  assert!(text.contains("signature [reporting]"));
  assert!(text.contains("$ ./configure -c"));

  Ok(())
}

#[test]
fn test_plan_json_lists_all_stages() -> Result<()> {
  let env = TestEnv::new()?;
  let output = env.run(&["plan", "--release-version", "3.1.1", "--candidate", "rc.1", "--json"])?;
  expect_success(&output)?;

  let plan: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let stages: Vec<&str> = plan["steps"]
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["stage"].as_str().unwrap())
    .collect();
  assert_eq!(stages.len(), 15);
  assert_eq!(stages.first(), Some(&"preflight"));
  assert_eq!(stages.last(), Some(&"completion"));
  assert_eq!(plan["artifact"], "apache-couchdb-3.1.1-RC1.tar.gz");

  Ok(())
}

#[test]
fn test_plan_reflects_config_file() -> Result<()> {
  let env = TestEnv::new()?;
  env.write_config(
    r#"
[workspace]
root = "/srv/rc-check"

[policy]
strict = ["diff"]
"#,
  )?;

  let output = env.run(&["plan", "--release-version", "3.1.1", "--candidate", "rc.1"])?;
  expect_success(&output)?;

  let text = stdout(&output);
  assert!(text.contains("diff [gating]"));
  assert!(text.contains("Work root: /srv/rc-check"));

  Ok(())
}

#[test]
fn test_plan_rejects_demoting_a_gating_stage() -> Result<()> {
  let env = TestEnv::new()?;
  env.write_config("[policy]\nstrict = [\"checksum\"]\n")?;

  let output = env.run(&["plan", "--release-version", "3.1.1", "--candidate", "rc.1"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("checksum"));

  Ok(())
}

#[test]
fn test_missing_explicit_config_is_user_error() -> Result<()> {
  let env = TestEnv::new()?;
  let output = env.run(&[
    "--config",
    "nope.toml",
    "plan",
    "--release-version",
    "3.1.1",
    "--candidate",
    "rc.1",
  ])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
