use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
fn default_directives(verbose: bool) -> &'static str {
  if verbose {
    "info,couchdb_release_check=debug"
  } else {
    "warn"
  }
}

/// Initialize diagnostics on stderr.
///
/// Operator-facing status goes through `ui::Console` on stdout; this channel
/// carries spawned command lines, exit codes and stage transitions.
pub fn init_logging(verbose: bool) {
  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

  // try_init: a second call (tests) keeps the first subscriber
  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_ansi(false)
    .with_target(false)
    .try_init();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_verbose_enables_crate_debug() {
    assert_eq!(default_directives(false), "warn");
    assert!(default_directives(true).contains("couchdb_release_check=debug"));
  }
}
