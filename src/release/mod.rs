//! Release candidate identity
//!
//! A candidate is addressed by the version being voted on and the candidate
//! label (`rc.1`, `rc.2`, ...). Every artifact name, URL and directory the
//! run touches is derived from those two strings.
//!
//! # Example
//!
//! ```text
//! version   = 3.1.1
//! candidate = rc.1
//! artifact  = apache-couchdb-3.1.1-RC1.tar.gz
//! url       = <base_url>3.1.1/rc.1/apache-couchdb-3.1.1-RC1.tar.gz
//! ```

pub mod identity;

pub use identity::{InstallPaths, ReleaseIdentity};
