//! Trace ingestion.
//!
//! Provides the raw per-cycle record type and the loader that parses simulator output
//! into an ordered sequence of records.

/// Newline-delimited JSON trace parsing.
pub mod loader;

/// Per-cycle record schema.
pub mod raw;

pub use loader::{load, load_file, normalize, strip_quoting};
pub use raw::{ExecuteControls, RawCycle};
