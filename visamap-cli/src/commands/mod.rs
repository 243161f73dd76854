//! Command modules for the visamap CLI
//!
//! Each module contains the argument struct and the `run_*` handler for
//! one subcommand.

pub mod import;
pub mod lookup;
pub mod serve;

pub use import::run_import;
pub use lookup::run_lookup;
pub use serve::run_serve;
