//! Pipeline State Decoder.
//!
//! Maps each [`RawCycle`] to a [`PipelineCycle`]: named stage state, resolved control signals
//! and a retired/stalled status. Decoding never fails; control codes that fall outside their
//! tables are decoded as `Undefined` and recorded as [`UndefinedControlCode`] anomalies on the
//! cycle.

use std::fmt;

use tracing::{debug, warn};

use crate::common::error::{ControlField, UndefinedControlCode};
use crate::common::reg::RegisterFile;
use crate::pipeline::signals::{
    AluOp, BranchOutcome, ControlSignals, MemAccess, OperandA, OperandB, WriteBackSource,
};
use crate::pipeline::stages::{
    CacheStatus, DecodeStage, ExecuteStage, FetchStage, Hazards, MemoryStage, StageEnables,
    SubsystemMessages, WriteBackStage,
};
use crate::trace::raw::RawCycle;

/// Whether a cycle advanced cleanly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CycleStatus {
    /// No hazard and both fetch paths hit.
    #[default]
    Retired,
    /// At least one [`StallCause`] applies.
    Stalled,
}

/// Reason a cycle is classified as stalled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StallCause {
    /// Data hazard flag set.
    DataHazard,
    /// Branch hazard flag set.
    BranchHazard,
    /// Instruction fetch did not complete.
    InstructionCacheMiss,
    /// Data fetch did not complete.
    DataCacheMiss,
}

impl StallCause {
    /// Short label for status lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::DataHazard => "Data",
            Self::BranchHazard => "Branch",
            Self::InstructionCacheMiss => "ICACHE",
            Self::DataCacheMiss => "DCACHE",
        }
    }
}

impl fmt::Display for StallCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One decoded cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineCycle {
    /// Position in the trace.
    pub index: usize,
    /// Register file at the end of the cycle.
    pub regs: RegisterFile,
    /// IF stage.
    pub fetch: FetchStage,
    /// ID stage.
    pub decode: DecodeStage,
    /// EX stage.
    pub execute: ExecuteStage,
    /// MEM stage.
    pub memory: MemoryStage,
    /// WB stage.
    pub write_back: WriteBackStage,
    /// Stage clock enables.
    pub enables: StageEnables,
    /// Hazard flags.
    pub hazards: Hazards,
    /// Fetch-path completion flags.
    pub cache: CacheStatus,
    /// Memory subsystem status text.
    pub messages: SubsystemMessages,
    /// Derived status.
    pub status: CycleStatus,
    /// Control codes that did not decode.
    pub anomalies: Vec<UndefinedControlCode>,
}

impl PipelineCycle {
    /// Returns `true` if the cycle is stalled.
    pub fn is_stalled(&self) -> bool {
        self.status == CycleStatus::Stalled
    }

    /// Returns the stall causes in the order data, branch, I-cache, D-cache.
    pub fn stall_causes(&self) -> Vec<StallCause> {
        stall_causes(&self.hazards, &self.cache)
    }

    /// Returns `true` if the fetch and decode paths both advanced, which gates register history.
    pub const fn front_end_advanced(&self) -> bool {
        self.cache.icache_hit && self.cache.dcache_hit
    }
}

/// Classifies a cycle from its hazard and cache-hit flags alone.
pub const fn classify(hazards: &Hazards, cache: &CacheStatus) -> CycleStatus {
    if hazards.data || hazards.branch || !cache.icache_hit || !cache.dcache_hit {
        CycleStatus::Stalled
    } else {
        CycleStatus::Retired
    }
}

fn stall_causes(hazards: &Hazards, cache: &CacheStatus) -> Vec<StallCause> {
    [
        (hazards.data, StallCause::DataHazard),
        (hazards.branch, StallCause::BranchHazard),
        (!cache.icache_hit, StallCause::InstructionCacheMiss),
        (!cache.dcache_hit, StallCause::DataCacheMiss),
    ]
    .into_iter()
    .filter_map(|(active, cause)| active.then_some(cause))
    .collect()
}

/// Accumulates undefined control codes found while decoding one cycle.
struct AnomalyLog<'a> {
    index: usize,
    found: &'a mut Vec<UndefinedControlCode>,
}

impl AnomalyLog<'_> {
    fn record(&mut self, field: ControlField, code: u32) {
        let anomaly = UndefinedControlCode { field, code };
        warn!(cycle = self.index, %anomaly, "control code outside decode table");
        self.found.push(anomaly);
    }

    fn check_controls(&mut self, ctrl: ControlSignals, codes: [u32; 4], fields: [ControlField; 2]) {
        let [c5, c6, c7, c9] = codes;
        let [mem_field, wb_field] = fields;
        if ctrl.mem.is_undefined() {
            self.record(mem_field, MemAccess::pack(c5, c6));
        }
        if ctrl.wb.is_undefined() {
            let packed = WriteBackSource::pack(c7, c9).unwrap_or(c7 | (c9 << 2));
            self.record(wb_field, packed);
        }
    }
}

/// Decodes one raw cycle.
///
/// # Arguments
///
/// * `index` - Position of the cycle in the trace.
/// * `raw` - The logged record.
///
/// # Returns
///
/// The decoded cycle. The result depends only on `index` and `raw`.
pub fn decode(index: usize, raw: &RawCycle) -> PipelineCycle {
    let mut anomalies = Vec::new();
    let mut log = AnomalyLog {
        index,
        found: &mut anomalies,
    };

    let ex = raw.ex_ctrl;
    if AluOp::out_of_table(ex.c4) {
        log.record(ControlField::ExecuteAlu, ex.c4);
    }
    let ex_ctrl = ControlSignals::decode(ex.c5, ex.c6, ex.c7, ex.c9);
    log.check_controls(
        ex_ctrl,
        [ex.c5, ex.c6, ex.c7, ex.c9],
        [ControlField::ExecuteMemAccess, ControlField::ExecuteWriteBack],
    );

    let mem_ctrl = ControlSignals::decode(raw.mem_c5, raw.mem_c6, raw.mem_c7, raw.mem_c9);
    log.check_controls(
        mem_ctrl,
        [raw.mem_c5, raw.mem_c6, raw.mem_c7, raw.mem_c9],
        [ControlField::MemoryMemAccess, ControlField::MemoryWriteBack],
    );

    let hazards = Hazards {
        data: raw.data_hazard,
        branch: raw.branch_hazard,
    };
    let cache = CacheStatus {
        icache_hit: raw.icache_hit,
        dcache_hit: raw.dcache_hit,
    };

    PipelineCycle {
        index,
        regs: raw.regs,
        fetch: FetchStage { pc: raw.fetch_pc },
        decode: DecodeStage {
            ir: raw.decode_ir,
            pc: raw.decode_pc,
            ret: raw.decode_ret,
        },
        execute: ExecuteStage {
            rd1: raw.ex_rd1,
            rd2: raw.ex_rd2,
            imm: raw.ex_imm,
            pc: raw.ex_pc,
            ret: raw.ex_ret,
            controls: ex,
            alu: AluOp::from_code(ex.c4),
            a_src: OperandA::from_code(ex.c3),
            b_src: OperandB::from_code(ex.c2),
            branch: BranchOutcome::from(raw.ex_branch),
            ctrl: ex_ctrl,
        },
        memory: MemoryStage {
            rd2: raw.mem_rd2,
            alu: raw.mem_alu,
            ret: raw.mem_ret,
            rd: raw.mem_c8,
            ctrl: mem_ctrl,
        },
        write_back: WriteBackStage {
            enable: raw.wb_enable,
            rd: raw.wb_rd,
            value: raw.wb_value,
        },
        enables: StageEnables {
            fetch: raw.ce_fetch,
            decode: raw.ce_decode,
            execute: raw.ce_execute,
            memory: raw.ce_memory,
            write_back: raw.ce_write_back,
        },
        status: classify(&hazards, &cache),
        hazards,
        cache,
        messages: SubsystemMessages {
            icache: raw.icache_msg.clone(),
            dcache: raw.dcache_msg.clone(),
            memory: raw.memory_msg.clone(),
            fsb: raw.fsb_msg.clone(),
        },
        anomalies,
    }
}

/// Decodes a whole trace, preserving order and length.
pub fn decode_all(raw: &[RawCycle]) -> Vec<PipelineCycle> {
    let cycles: Vec<PipelineCycle> = raw
        .iter()
        .enumerate()
        .map(|(index, cycle)| decode(index, cycle))
        .collect();
    let stalled = cycles.iter().filter(|c| c.is_stalled()).count();
    debug!(cycles = cycles.len(), stalled, "trace decoded");
    cycles
}
