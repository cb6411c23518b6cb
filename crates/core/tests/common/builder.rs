//! Fluent builders for raw trace records and trace text.

use pipetrace_core::pipeline::{PipelineCycle, decode_all};
use pipetrace_core::trace::RawCycle;
use serde_json::{Map, Value, json};

/// Builds one [`RawCycle`].
///
/// Starts from a quiet cycle: no hazards, both fetch paths complete, all stages enabled,
/// write-back disabled.
#[derive(Clone, Debug)]
pub struct CycleBuilder(RawCycle);

impl Default for CycleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleBuilder {
    pub fn new() -> Self {
        Self(RawCycle {
            ce_fetch: true,
            ce_decode: true,
            ce_execute: true,
            ce_memory: true,
            ce_write_back: true,
            icache_hit: true,
            dcache_hit: true,
            ..RawCycle::default()
        })
    }

    pub fn pc(mut self, pc: u32) -> Self {
        self.0.fetch_pc = pc;
        self
    }

    pub fn reg(mut self, idx: usize, val: u32) -> Self {
        self.0.regs.write(idx, val);
        self
    }

    /// Write-back of `val` to `rd` with the enable set.
    pub fn write_back(mut self, rd: u32, val: u32) -> Self {
        self.0.wb_enable = true;
        self.0.wb_rd = rd;
        self.0.wb_value = val;
        self
    }

    /// Write-back fields without the enable.
    pub fn write_back_disabled(mut self, rd: u32, val: u32) -> Self {
        self.0.wb_enable = false;
        self.0.wb_rd = rd;
        self.0.wb_value = val;
        self
    }

    pub fn data_hazard(mut self) -> Self {
        self.0.data_hazard = true;
        self
    }

    pub fn branch_hazard(mut self) -> Self {
        self.0.branch_hazard = true;
        self
    }

    pub fn icache_miss(mut self) -> Self {
        self.0.icache_hit = false;
        self
    }

    pub fn dcache_miss(mut self) -> Self {
        self.0.dcache_hit = false;
        self
    }

    pub fn alu(mut self, code: u32) -> Self {
        self.0.ex_ctrl.c4 = code;
        self
    }

    /// Execute-stage memory (`c5` write, `c6` read) and write-back (`c7` low, `c9` high) selectors.
    pub fn ex_selectors(mut self, c5: u32, c6: u32, c7: u32, c9: u32) -> Self {
        self.0.ex_ctrl.c5 = c5;
        self.0.ex_ctrl.c6 = c6;
        self.0.ex_ctrl.c7 = c7;
        self.0.ex_ctrl.c9 = c9;
        self
    }

    /// Memory-stage selectors, in the same order as [`CycleBuilder::ex_selectors`].
    pub fn mem_selectors(mut self, c5: u32, c6: u32, c7: u32, c9: u32) -> Self {
        self.0.mem_c5 = c5;
        self.0.mem_c6 = c6;
        self.0.mem_c7 = c7;
        self.0.mem_c9 = c9;
        self
    }

    pub fn icache_msg(mut self, msg: &str) -> Self {
        self.0.icache_msg = msg.to_owned();
        self
    }

    pub fn build(self) -> RawCycle {
        self.0
    }

    /// The record as one line of simulator output.
    pub fn json(self) -> String {
        to_json(&self.0).to_string()
    }
}

/// Serializes a record with the simulator's key names and `0`/`1` flags.
pub fn to_json(raw: &RawCycle) -> Value {
    let mut map = Map::new();
    for (idx, val) in raw.regs.values().iter().enumerate() {
        let _ = map.insert(format!("x{idx}"), json!(val));
    }
    let ex = raw.ex_ctrl.as_array();
    for (idx, code) in ex.iter().enumerate() {
        let _ = map.insert(format!("ex_c{}", idx + 1), json!(code));
    }
    let flag = |b: bool| json!(u8::from(b));
    let fields = [
        ("if_pc", json!(raw.fetch_pc)),
        ("id_ir", json!(raw.decode_ir)),
        ("id_pc", json!(raw.decode_pc)),
        ("id_ret", json!(raw.decode_ret)),
        ("ex_rd1", json!(raw.ex_rd1)),
        ("ex_rd2", json!(raw.ex_rd2)),
        ("ex_imm", json!(raw.ex_imm)),
        ("ex_pc", json!(raw.ex_pc)),
        ("ex_ret", json!(raw.ex_ret)),
        ("ex_cb", flag(raw.ex_branch)),
        ("mem_rd2", json!(raw.mem_rd2)),
        ("mem_alu", json!(raw.mem_alu)),
        ("mem_ret", json!(raw.mem_ret)),
        ("mem_c5", json!(raw.mem_c5)),
        ("mem_c6", json!(raw.mem_c6)),
        ("mem_c7", json!(raw.mem_c7)),
        ("mem_c8", json!(raw.mem_c8)),
        ("mem_c9", json!(raw.mem_c9)),
        ("wb_c9", flag(raw.wb_enable)),
        ("wb_c8", json!(raw.wb_rd)),
        ("wb_wb", json!(raw.wb_value)),
        ("mi", json!(raw.icache_msg)),
        ("md", json!(raw.dcache_msg)),
        ("mr", json!(raw.memory_msg)),
        ("mf", json!(raw.fsb_msg)),
        ("ce_if", flag(raw.ce_fetch)),
        ("ce_id", flag(raw.ce_decode)),
        ("ce_ex", flag(raw.ce_execute)),
        ("ce_mem", flag(raw.ce_memory)),
        ("ce_wb", flag(raw.ce_write_back)),
        ("hz_dat", flag(raw.data_hazard)),
        ("hz_br", flag(raw.branch_hazard)),
        ("i_fetch", flag(raw.icache_hit)),
        ("d_fetch", flag(raw.dcache_hit)),
    ];
    for (key, val) in fields {
        let _ = map.insert(key.to_owned(), val);
    }
    Value::Object(map)
}

/// Joins records into newline-delimited trace text.
pub fn trace_text(cycles: &[RawCycle]) -> String {
    cycles
        .iter()
        .map(|c| format!("{}\n", to_json(c)))
        .collect()
}

/// Decodes a list of builders.
pub fn decoded(builders: Vec<CycleBuilder>) -> Vec<PipelineCycle> {
    let raw: Vec<RawCycle> = builders.into_iter().map(CycleBuilder::build).collect();
    decode_all(&raw)
}

/// `n` quiet cycles fetching consecutive instructions from `base`.
pub fn quiet(n: usize, base: u32) -> Vec<CycleBuilder> {
    (0..n)
        .map(|i| CycleBuilder::new().pc(base + 4 * i as u32))
        .collect()
}

/// A small listing with resolved lines at `0xf8`, `0x100` and `0x108` around a label.
pub const LISTING: &str = "\
prog:     file format elf32-littleriscv

Disassembly of section .text:

000000f8 <loop>:
  f8:\t00150513          \taddi\ta0,a0,1
 100:\tfe051ce3          \tbnez\ta0,f8 <loop>
 108:\t00008067          \tret
";
