//! Command implementations.

pub mod ingest;
pub mod init;
pub mod query;
pub mod setup;

pub use self::ingest::execute_ingest;
pub use self::init::execute_init;
pub use self::query::execute_query;
pub use self::setup::{build_engine, build_indexer, Engine};
