//! Country name and ISO code lookup

use anyhow::{bail, Result};
use clap::Parser;

use visamap_core::{iso_from_name, name_from_iso};

/// Arguments for the lookup command
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Nationality as written in the dataset, or an ISO alpha-2 code
    pub query: String,
}

/// Print how a nationality or a code resolves.
///
/// Two-letter input is tried as an ISO code first.
pub fn run_lookup(args: LookupArgs) -> Result<()> {
    let query = args.query.trim();

    if query.len() == 2 {
        if let Some(name) = name_from_iso(query) {
            println!("{} -> {}", query.to_ascii_uppercase(), name);
            return Ok(());
        }
    }

    match iso_from_name(query) {
        Some(iso) => {
            println!("{} -> {}", query, iso);
            Ok(())
        }
        None => bail!("No country found for '{}'", query),
    }
}
