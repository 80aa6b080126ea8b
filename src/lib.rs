//! Workspace tooling package.
//!
//! Exists so the root manifest can carry the git hook configuration; the
//! code lives in `crates/emroute-lib` and `crates/emroute-cli`.
