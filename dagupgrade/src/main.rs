mod args;

use args::Args;
use blockdag_consensus::upgrade::DbUpgrader;
use blockdag_core::{error, info, log::init_logger};
use blockdag_database::prelude::ConnBuilder;
use clap::Parser;
use std::{error::Error, process::exit};

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let db = ConnBuilder::default()
        .with_db_path(args.db_dir.clone())
        .with_create_if_missing(false)
        .with_files_limit(args.files_limit)
        .build()?;
    info!("Opened database at {}", args.db_dir.display());

    let upgrader = DbUpgrader::new(db, args.upgrade_config());
    match upgrader.upgrade_with_block_total(args.block_total)? {
        Some(summary) => info!("Migrated {} of {} legacy blocks", summary.blocks_written, summary.blocks_read),
        None => info!("Nothing to upgrade"),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(err) = init_logger(args.logdir.as_deref(), &args.log_level) {
        eprintln!("Failed initializing the logger: {err}");
        exit(1);
    }

    if let Err(err) = run(&args) {
        error!("Block index upgrade failed: {}", err);
        exit(1);
    }
}
