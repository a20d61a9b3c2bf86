use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Boundary import CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "bndimport", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a GeoJSON feature collection into the boundary store
    Import(ImportArgs),

    /// Verify the boundary table and its merge columns exist
    CheckSchema(StoreArgs),

    /// Inspect persisted data for duplicate administrative units
    CheckDuplicates(CheckDuplicatesArgs),

    /// Re-check persisted data for units needing consolidation
    Merge(StoreArgs),
}

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// SQLite database path (falls back to $BOUNDARY_DB)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub db: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Input GeoJSON feature collection
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Delete this prefecture's existing records before importing
    #[arg(long, value_name = "CODE")]
    pub replace_prefecture: Option<String>,

    /// Skip the post-import duplicate verification pass
    #[arg(long)]
    pub no_check: bool,

    /// Group size above which units are chunked or skipped
    #[arg(long, default_value_t = 5000)]
    pub skip_threshold: usize,
}

#[derive(Args, Debug)]
pub struct CheckDuplicatesArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Whole-table statistics plus full-field duplicate listing
    #[arg(long)]
    pub detailed: bool,
}
