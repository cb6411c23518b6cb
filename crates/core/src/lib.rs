//! Pipeline trace debugger library.
//!
//! This crate reconstructs and navigates the cycle-by-cycle trace of a five-stage RISC-V
//! pipeline simulator. It provides the following:
//! 1. **Trace:** Parsing of the simulator's newline-delimited JSON records.
//! 2. **Pipeline:** Decoding of packed control codes into named stage state and stall status.
//! 3. **History:** The log of committed register writes.
//! 4. **Disassembly:** Correlation of the fetch PC with an objdump-style listing.
//! 5. **Navigation:** Cursor commands and per-cycle snapshots.
//! 6. **Simulation:** Time-bounded simulator acquisition, sessions, configuration and statistics.

/// Common types and constants (registers, errors, decode-table bounds).
pub mod common;
/// Session configuration (defaults and JSON loading).
pub mod config;
/// Disassembly listing and PC correlation.
pub mod disasm;
/// Register write history.
pub mod history;
/// Cursor commands and snapshots.
pub mod navigator;
/// Pipeline state decoding (signals, stages, decoder).
pub mod pipeline;
/// Simulator acquisition and session construction.
pub mod sim;
/// Trace statistics collection and reporting.
pub mod stats;
/// Raw trace records and loading.
pub mod trace;

/// Session settings; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Error type and result alias shared by every fallible operation.
pub use crate::common::{Result, TraceError};
/// Cursor over a decoded trace; obtain one from a [`Session`].
pub use crate::navigator::{Command, CycleNavigator, Snapshot};
/// Fully constructed debugging session.
pub use crate::sim::Session;
/// Whole-trace summary.
pub use crate::stats::TraceStats;
