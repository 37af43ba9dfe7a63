//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Every program preflight looks for, with default config
pub const ALL_TOOLS: [&str; 10] = [
  "erl",
  "wget",
  "curl",
  "gpg",
  "sha256sum",
  "sha512sum",
  "git",
  "tar",
  "diff",
  "make",
];

/// Saves each download under its basename, plus the `.ish` sidecar next to the tarball
const FAKE_WGET: &str = r#"name="${1##*/}"
echo artifact > "$name"
case "$name" in
  *.tar.gz) echo 0123abcd > "$name.ish" ;;
esac"#;

/// Unpacking creates the source dir with a runnable configure script
const FAKE_TAR: &str = r#"case "$1" in
  -xzf)
    mkdir -p apache-couchdb-3.1.1
    printf '#!/bin/sh\nexit 0\n' > apache-couchdb-3.1.1/configure
    chmod +x apache-couchdb-3.1.1/configure
    ;;
  -xf) cat > /dev/null ;;
esac"#;

/// A scratch directory with a fake tool bin dir and a work root
pub struct TestEnv {
  _root: TempDir,
  /// Directory the binary runs in (config files go here)
  pub path: PathBuf,
  pub bin: PathBuf,
  pub work_root: PathBuf,
}

impl TestEnv {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("cwd");
    let bin = root.path().join("bin");
    let work_root = root.path().join("couchdb");
    fs::create_dir_all(&path)?;
    fs::create_dir_all(&bin)?;

    Ok(Self {
      _root: root,
      path,
      bin,
      work_root,
    })
  }

  /// Install an executable shell script named `name` into the bin dir
  pub fn install_tool(&self, name: &str, body: &str) -> Result<()> {
    let script = self.bin.join(name);
    fs::write(&script, format!("#!/bin/sh\n{}\n", body))?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
    Ok(())
  }

  /// Every tool present, each exiting 0 without doing anything
  pub fn install_noop_tools(&self) -> Result<()> {
    for tool in ALL_TOOLS {
      self.install_tool(tool, "exit 0")?;
    }
    Ok(())
  }

  /// Every tool present, behaving enough like the real ones for a full run
  pub fn install_release_tools(&self) -> Result<()> {
    self.install_noop_tools()?;
    self.install_tool("wget", FAKE_WGET)?;
    self.install_tool("tar", FAKE_TAR)?;
    Ok(())
  }

  /// Fake tools first, then the system dirs for the shell utilities they use
  pub fn path_var(&self) -> String {
    format!("{}:/usr/bin:/bin", self.bin.display())
  }

  pub fn write_config(&self, content: &str) -> Result<()> {
    fs::write(self.path.join("release-check.toml"), content)?;
    Ok(())
  }

  pub fn work_root_arg(&self) -> String {
    self.work_root.display().to_string()
  }

  /// Run with the fake tools on PATH and no stdin
  pub fn run(&self, args: &[&str]) -> Result<Output> {
    run_release_check(&self.path, args, &self.path_var(), None)
  }

  /// Run with the fake tools on PATH, feeding `input` on stdin
  pub fn run_with_input(&self, args: &[&str], input: &str) -> Result<Output> {
    run_release_check(&self.path, args, &self.path_var(), Some(input))
  }

  /// Run with an explicit PATH
  pub fn run_with_path(&self, args: &[&str], path_var: &str) -> Result<Output> {
    run_release_check(&self.path, args, path_var, None)
  }

  pub fn report(&self) -> Result<serde_json::Value> {
    let content = fs::read_to_string(self.work_root.join("verification-report.json"))?;
    Ok(serde_json::from_str(&content)?)
  }
}

/// Run the couchdb-release-check binary; a nonzero exit is returned, not raised
pub fn run_release_check(cwd: &Path, args: &[&str], path_var: &str, input: Option<&str>) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_couchdb-release-check");

  let mut child = Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env("PATH", path_var)
    .env_remove("RUST_LOG")
    .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to run couchdb-release-check")?;

  if let Some(input) = input {
    let mut stdin = child.stdin.take().context("No stdin pipe")?;
    stdin.write_all(input.as_bytes())?;
  }

  child.wait_with_output().context("Failed to wait for couchdb-release-check")
}

/// Bail unless the command exited 0
pub fn expect_success(output: &Output) -> Result<()> {
  if !output.status.success() {
    anyhow::bail!(
      "couchdb-release-check failed ({:?})\nstdout: {}\nstderr: {}",
      output.status.code(),
      stdout(output),
      stderr(output)
    );
  }
  Ok(())
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
