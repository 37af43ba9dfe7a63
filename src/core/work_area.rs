//! Scratch directory layout for one verification run

use crate::core::error::{ResultExt, VerifyResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// `<root>/dist`, `<root>/git` and `<root>/tree`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkArea {
  root: PathBuf,
}

impl WorkArea {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Downloaded artifacts, unpacked sources and build output
  pub fn dist(&self) -> PathBuf {
    self.root.join("dist")
  }

  /// Clone of the source repository
  pub fn git(&self) -> PathBuf {
    self.root.join("git")
  }

  /// Reference tree exported from the repository
  pub fn tree(&self) -> PathBuf {
    self.root.join("tree")
  }

  /// JSON summary written at the end of the run
  pub fn report_path(&self) -> PathBuf {
    self.root.join("verification-report.json")
  }

  /// Remove the root if present and recreate the three directories.
  ///
  /// Returns true when a previous run's root was deleted.
  pub fn reset(&self) -> VerifyResult<bool> {
    let existed = self.root.exists();
    if existed {
      fs::remove_dir_all(&self.root).with_context(|| format!("Failed to delete {}", self.root.display()))?;
    }

    for dir in [self.dist(), self.git(), self.tree()] {
      fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    Ok(existed)
  }

  /// File names in `dist`, sorted
  pub fn list_dist(&self) -> VerifyResult<Vec<String>> {
    let dist = self.dist();
    let mut names = Vec::new();
    for entry in fs::read_dir(&dist).with_context(|| format!("Failed to list {}", dist.display()))? {
      let entry = entry?;
      names.push(entry.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
  }
}
