//! Raw cycle records.
//!
//! This module defines the per-cycle record emitted by the simulator's JSON logger. It provides:
//! 1. **Fixed Schema:** One field per logged signal, renamed from the simulator's key names.
//! 2. **Register Collection:** The flat `x0`..`x31` keys gathered into a [`RegisterFile`].
//! 3. **Flag Decoding:** Boolean signals accepted either as `0`/`1` integers or JSON booleans.

use std::fmt;

use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};

use crate::common::reg::RegisterFile;

/// One simulated clock cycle exactly as the simulator logged it.
///
/// Control codes are kept in their packed numeric form; see
/// [`crate::pipeline::decoder::decode`] for their interpretation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RawCycle {
    /// Register file contents at the end of the cycle.
    #[serde(flatten)]
    pub regs: RegisterFile,

    /// Fetch-stage program counter.
    #[serde(rename = "if_pc")]
    pub fetch_pc: u32,

    /// Decode-stage instruction word.
    #[serde(rename = "id_ir")]
    pub decode_ir: u32,
    /// Decode-stage program counter.
    #[serde(rename = "id_pc")]
    pub decode_pc: u32,
    /// Decode-stage predicted return address.
    #[serde(rename = "id_ret")]
    pub decode_ret: u32,

    /// Execute-stage operand A (register read port 1).
    pub ex_rd1: u32,
    /// Execute-stage operand B (register read port 2).
    pub ex_rd2: u32,
    /// Execute-stage immediate.
    pub ex_imm: u32,
    /// Execute-stage program counter.
    pub ex_pc: u32,
    /// Execute-stage return address.
    pub ex_ret: u32,
    /// Execute-stage control codes `c1`..`c9`, in order.
    #[serde(flatten)]
    pub ex_ctrl: ExecuteControls,
    /// Execute-stage branch-taken signal.
    #[serde(rename = "ex_cb", deserialize_with = "flag")]
    pub ex_branch: bool,

    /// Memory-stage store operand.
    pub mem_rd2: u32,
    /// Memory-stage ALU result.
    pub mem_alu: u32,
    /// Memory-stage return address.
    pub mem_ret: u32,
    /// Memory-stage write selector.
    pub mem_c5: u32,
    /// Memory-stage read selector.
    pub mem_c6: u32,
    /// Memory-stage low write-back selector.
    pub mem_c7: u32,
    /// Memory-stage destination register; older simulator builds omit it.
    #[serde(default)]
    pub mem_c8: u32,
    /// Memory-stage high write-back selector.
    pub mem_c9: u32,

    /// Write-back enable.
    #[serde(rename = "wb_c9", deserialize_with = "flag")]
    pub wb_enable: bool,
    /// Write-back destination register index.
    #[serde(rename = "wb_c8")]
    pub wb_rd: u32,
    /// Write-back value.
    #[serde(rename = "wb_wb")]
    pub wb_value: u32,

    /// Instruction-cache status message.
    #[serde(rename = "mi", default)]
    pub icache_msg: String,
    /// Data-cache status message.
    #[serde(rename = "md", default)]
    pub dcache_msg: String,
    /// Main-memory status message.
    #[serde(rename = "mr", default)]
    pub memory_msg: String,
    /// Front-side bus status message.
    #[serde(rename = "mf", default)]
    pub fsb_msg: String,

    /// Fetch stage clock enable.
    #[serde(rename = "ce_if", deserialize_with = "flag")]
    pub ce_fetch: bool,
    /// Decode stage clock enable.
    #[serde(rename = "ce_id", deserialize_with = "flag")]
    pub ce_decode: bool,
    /// Execute stage clock enable.
    #[serde(rename = "ce_ex", deserialize_with = "flag")]
    pub ce_execute: bool,
    /// Memory stage clock enable.
    #[serde(rename = "ce_mem", deserialize_with = "flag")]
    pub ce_memory: bool,
    /// Write-back stage clock enable.
    #[serde(rename = "ce_wb", deserialize_with = "flag")]
    pub ce_write_back: bool,

    /// Data hazard detected.
    #[serde(rename = "hz_dat", alias = "hz_hz", deserialize_with = "flag")]
    pub data_hazard: bool,
    /// Branch hazard detected.
    #[serde(rename = "hz_br", deserialize_with = "flag")]
    pub branch_hazard: bool,

    /// Instruction fetch completed (instruction-cache hit).
    #[serde(rename = "i_fetch", deserialize_with = "flag")]
    pub icache_hit: bool,
    /// Data fetch completed (data-cache hit).
    #[serde(rename = "d_fetch", deserialize_with = "flag")]
    pub dcache_hit: bool,
}

/// The nine packed execute-stage control codes.
///
/// `c2`/`c3` select operand sources, `c4` selects the ALU operation, `c5`/`c6` select memory
/// write/read and `c7`/`c9` select the write-back source. `c1` and `c8` are shown verbatim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ExecuteControls {
    /// Control code `c1`.
    #[serde(rename = "ex_c1")]
    pub c1: u32,
    /// Operand B select.
    #[serde(rename = "ex_c2")]
    pub c2: u32,
    /// Operand A select.
    #[serde(rename = "ex_c3")]
    pub c3: u32,
    /// ALU selector.
    #[serde(rename = "ex_c4")]
    pub c4: u32,
    /// Memory write select.
    #[serde(rename = "ex_c5")]
    pub c5: u32,
    /// Memory read select.
    #[serde(rename = "ex_c6")]
    pub c6: u32,
    /// Low write-back selector.
    #[serde(rename = "ex_c7")]
    pub c7: u32,
    /// Destination register.
    #[serde(rename = "ex_c8")]
    pub c8: u32,
    /// High write-back selector.
    #[serde(rename = "ex_c9")]
    pub c9: u32,
}

impl ExecuteControls {
    /// Returns the codes as an array ordered `c1`..`c9`.
    pub const fn as_array(&self) -> [u32; 9] {
        [
            self.c1, self.c2, self.c3, self.c4, self.c5, self.c6, self.c7, self.c8, self.c9,
        ]
    }
}

/// Deserializes a signal that the simulator logs as `0`/`1` but may also appear as a boolean.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or an unsigned integer flag")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            if v < 0 {
                return Err(E::invalid_value(de::Unexpected::Signed(v), &self));
            }
            Ok(v != 0)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}
