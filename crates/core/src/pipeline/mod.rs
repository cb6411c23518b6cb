//! Pipeline state decoding.
//!
//! This module reconstructs the state of the five-stage pipeline from raw trace records.
//! It includes the following components:
//! 1. **Signals:** Decode tables for the packed control codes.
//! 2. **Stages:** Per-stage state for Fetch, Decode, Execute, Memory and Write-back.
//! 3. **Decoder:** The pure raw-to-decoded mapping and stall classification.

/// Raw record to decoded cycle mapping.
pub mod decoder;

/// Control signals and their decode tables.
pub mod signals;

/// Per-stage state views.
pub mod stages;

pub use decoder::{CycleStatus, PipelineCycle, StallCause, classify, decode, decode_all};
pub use signals::{
    AluOp, BranchOutcome, ControlSignals, MemAccess, OperandA, OperandB, WriteBackSource,
};
