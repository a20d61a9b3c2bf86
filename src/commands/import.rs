use std::time::Duration;

use anyhow::Result;

use crate::cli::{Cli, ImportArgs};
use crate::commands::{audit, database_path};
use crate::feature;
use crate::pacer::FixedPacer;
use crate::pipeline::{self, ImportConfig};
use crate::store::{BoundaryStore, SqliteStore};

/// Pause between consecutive record inserts.
const WRITE_PAUSE: Duration = Duration::from_millis(100);

/// Pause between accumulation sub-batches of an oversized group.
const BATCH_PAUSE: Duration = Duration::from_millis(200);

pub fn run(cli: &Cli, args: &ImportArgs) -> Result<()> {
    let collection = feature::read_feature_collection(&args.input)?;
    feature::print_collection_stats(&collection);

    let db_path = database_path(&args.store)?;
    let mut store = SqliteStore::open(&db_path)?;

    if let Some(code) = &args.replace_prefecture {
        let deleted = store.delete_prefecture(code)?;
        println!("Deleted {deleted} existing records for prefecture {code}");
    }

    let config = ImportConfig { skip_threshold: args.skip_threshold, verbose: cli.verbose };
    let write_pacer = FixedPacer::new(WRITE_PAUSE);
    let batch_pacer = FixedPacer::new(BATCH_PAUSE);

    let result =
        pipeline::run_import(&collection, &mut store, &write_pacer, &batch_pacer, &config)?;

    println!("{}", result.summary(config.skip_threshold));

    if !args.no_check {
        println!("\nRunning post-import duplicate check...");
        audit::run_consolidation_check(&mut store)?;
    }

    println!("Import complete.");
    Ok(())
}
