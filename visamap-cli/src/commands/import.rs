//! CSV import command
//!
//! Loads a Home Office entry clearance CSV into the `immigration` table.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use visamap_core::{read_records_from_path, ImportReport};
use visamap_server::db::{create_pool, StatsRepo};

/// Arguments for the import command
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Path to the CSV file
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Drop and recreate the table before inserting
    #[arg(long)]
    pub reset: bool,

    /// Parse the file and report counts without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Parse the CSV and bulk insert it
pub async fn run_import(args: ImportArgs) -> Result<()> {
    let batch = read_records_from_path(&args.csv)
        .with_context(|| format!("Failed to read {}", args.csv.display()))?;

    if batch.skipped > 0 {
        warn!(skipped = batch.skipped, "some rows could not be converted");
    }

    let mut report = ImportReport {
        inserted: 0,
        skipped: batch.skipped,
        reset: args.reset,
    };

    if args.dry_run {
        info!(rows = batch.records.len(), "dry run, nothing written");
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.visamap/.env")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    report.inserted = StatsRepo::new(&pool)
        .import(&batch.records, args.reset)
        .await
        .context("Import failed")?;

    if report.reset {
        info!("Table dropped and recreated");
    }
    if report.inserted == 0 {
        info!("No new entries were added");
    } else {
        info!(rows = report.inserted, "Inserted entries into immigration");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
