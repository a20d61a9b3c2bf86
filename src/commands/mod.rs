use std::path::PathBuf;

use anyhow::{Result, bail};

use crate::cli::StoreArgs;

pub mod audit;
pub mod import;

/// Store location: the `--db` flag first, then `$BOUNDARY_DB`. Neither
/// being set is configuration-fatal.
pub fn database_path(args: &StoreArgs) -> Result<PathBuf> {
    if let Some(path) = &args.db {
        return Ok(path.clone());
    }
    match std::env::var_os("BOUNDARY_DB") {
        Some(value) => Ok(PathBuf::from(value)),
        None => bail!("No boundary store configured: pass --db <path> or set BOUNDARY_DB"),
    }
}
