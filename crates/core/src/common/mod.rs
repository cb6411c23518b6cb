//! Common utilities and types used throughout the trace engine.
//!
//! This module provides the building blocks shared by every stage of the engine. It includes:
//! 1. **Constants:** Register-file size, decode-table bounds and session defaults.
//! 2. **Error Handling:** The fatal error enum and the non-fatal anomaly records.
//! 3. **Register Management:** A fixed-size register file snapshot with ABI naming.

/// Common constants used throughout the engine.
pub mod constants;

/// Error types and non-fatal anomaly records.
pub mod error;

/// Register file snapshot.
pub mod reg;

pub use constants::{NUM_REGS, ZERO_REG};
pub use error::{AddressNotFound, ControlField, Result, TraceError, UndefinedControlCode};
pub use reg::{RegisterFile, abi_name};
