//! PATH lookup for executables

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Find `program` the way a shell would.
///
/// Names containing a path separator are checked as given; bare names are
/// searched in each entry of `path_var`.
pub fn find_executable(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
  if program.is_empty() {
    return None;
  }

  if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
    let candidate = PathBuf::from(program);
    return is_executable(&candidate).then_some(candidate);
  }

  let path_var = path_var?;
  std::env::split_paths(path_var)
    .filter(|dir| !dir.as_os_str().is_empty())
    .map(|dir| dir.join(program))
    .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
  use std::os::unix::fs::PermissionsExt;

  match std::fs::metadata(path) {
    Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
    Err(_) => false,
  }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
  path.is_file() || path.with_extension("exe").is_file()
}
