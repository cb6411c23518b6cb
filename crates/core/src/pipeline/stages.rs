//! Pipeline stage state decoded from one cycle.
//!
//! This module defines the per-stage views of the 5-stage pipeline:
//! Fetch → Decode → Execute → Memory → Write-back.
//!
//! 1. **Stage Latches:** The values each stage holds at the end of the cycle.
//! 2. **Enables and Hazards:** Clock enables, hazard flags and cache-hit flags.
//! 3. **Subsystem Messages:** Status text from the cache, memory and bus models.

use crate::pipeline::signals::{AluOp, BranchOutcome, ControlSignals, OperandA, OperandB};
use crate::trace::raw::ExecuteControls;

/// Fetch (IF) stage state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchStage {
    /// Program counter being fetched.
    pub pc: u32,
}

/// Decode (ID) stage state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeStage {
    /// Instruction word being decoded.
    pub ir: u32,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Predicted return address.
    pub ret: u32,
}

/// Execute (EX) stage state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteStage {
    /// Register read port 1 value.
    pub rd1: u32,
    /// Register read port 2 value.
    pub rd2: u32,
    /// Immediate operand.
    pub imm: u32,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Return address.
    pub ret: u32,
    /// Control codes `c1`..`c9` as logged.
    pub controls: ExecuteControls,
    /// ALU operation.
    pub alu: AluOp,
    /// Operand A source.
    pub a_src: OperandA,
    /// Operand B source.
    pub b_src: OperandB,
    /// Branch unit outcome.
    pub branch: BranchOutcome,
    /// Memory and write-back controls.
    pub ctrl: ControlSignals,
}

/// Memory access (MEM) stage state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStage {
    /// Store operand.
    pub rd2: u32,
    /// ALU result (address or value to write back).
    pub alu: u32,
    /// Return address.
    pub ret: u32,
    /// Destination register carried to write-back.
    pub rd: u32,
    /// Memory and write-back controls.
    pub ctrl: ControlSignals,
}

/// Write-back (WB) stage state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteBackStage {
    /// Register write enable.
    pub enable: bool,
    /// Destination register index.
    pub rd: u32,
    /// Value written.
    pub value: u32,
}

/// Per-stage clock enables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageEnables {
    /// IF enabled.
    pub fetch: bool,
    /// ID enabled.
    pub decode: bool,
    /// EX enabled.
    pub execute: bool,
    /// MEM enabled.
    pub memory: bool,
    /// WB enabled.
    pub write_back: bool,
}

impl StageEnables {
    /// Returns `(label, enabled)` pairs in pipeline order.
    pub const fn labelled(&self) -> [(&'static str, bool); 5] {
        [
            ("IF", self.fetch),
            ("ID", self.decode),
            ("EX", self.execute),
            ("MA", self.memory),
            ("WB", self.write_back),
        ]
    }
}

/// Hazard detection outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hazards {
    /// Data hazard (operand not yet available).
    pub data: bool,
    /// Branch hazard (control-flow redirect).
    pub branch: bool,
}

/// Cache hit flags for the two fetch paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStatus {
    /// Instruction fetch completed this cycle.
    pub icache_hit: bool,
    /// Data fetch completed this cycle.
    pub dcache_hit: bool,
}

/// Status text logged by the memory subsystem models.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubsystemMessages {
    /// Instruction cache.
    pub icache: String,
    /// Data cache.
    pub dcache: String,
    /// Main memory.
    pub memory: String,
    /// Front-side bus.
    pub fsb: String,
}
