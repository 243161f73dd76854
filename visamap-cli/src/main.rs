mod commands;
mod config;
mod tracing_setup;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::import::ImportArgs;
use crate::commands::lookup::LookupArgs;
use crate::commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(name = "visamap", version, about = "UK entry clearance visa map")]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces to an OTLP endpoint (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the map web server
    Serve(ServeArgs),
    /// Import a visa decisions CSV into the database
    Import(ImportArgs),
    /// Resolve a nationality to its ISO code, or a code to its name
    Lookup(LookupArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so `env = ...` arguments see .env values
    let loaded_from = config::load_dotenv();

    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;
    config::report_dotenv(&loaded_from);

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Import(args) => commands::run_import(args).await,
        Commands::Lookup(args) => commands::run_lookup(args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "visamap", &mut io::stdout());
            Ok(())
        }
    };

    tracing_setup::shutdown_otel();
    result
}
