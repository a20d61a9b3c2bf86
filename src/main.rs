use anyhow::Result;
use clap::{CommandFactory, Parser};

use bndimport::cli::{Cli, Commands};
use bndimport::commands::{audit, import};

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Import(args)) => import::run(&cli, args),
        Some(Commands::CheckSchema(args)) => audit::check_schema(&cli, args),
        Some(Commands::CheckDuplicates(args)) => audit::check_duplicates(&cli, args),
        Some(Commands::Merge(args)) => audit::merge(&cli, args),
        None => {
            let mut command = Cli::command();
            command.print_help()?;
            Ok(())
        }
    }
}
