//! Whois country table ingestion.
//!
//! - `parser`: single-line record parsing
//! - `loader`: filtering and capping records into a [`crate::ip::Registry`]

pub mod loader;
pub mod parser;

pub use loader::{load_registry, load_registry_file, LoadError, LoadStats, DEFAULT_WHOIS_DB, MIN_RANGE_WIDTH};
pub use parser::{parse_line, RecordError, WhoisRecord};
