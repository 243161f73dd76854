//! Database layer - connection pool, schema and the stats repository
//!
//! - Connection pool via sqlx `PgPool`
//! - One aggregate query per request
//! - Filters are always bound parameters, never interpolated

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options, ping};
pub use repos::*;
