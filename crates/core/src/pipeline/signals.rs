//! Pipeline control signals and their decode tables.
//!
//! This module turns the simulator's packed control codes into named signals. It performs:
//! 1. **Operation Classification:** Resolves the 6-bit ALU selector into an [`AluOp`].
//! 2. **Operand Selection:** Names the sources for ALU inputs (register file, PC or immediate).
//! 3. **Memory Control:** Resolves the read/write selector pair into a [`MemAccess`] mode.
//! 4. **Write-back Control:** Resolves the two write-back selectors into a [`WriteBackSource`].
//!
//! Every mapping is total: codes outside a table decode to an `Undefined` variant.

use std::fmt;

use crate::common::constants::{
    ALU_DEFINED_BASE, ALU_GROUP_MASK, ALU_TABLE_LEN, ALU_UPPER_BASE, ALU_VARIANT_BIT,
    WB_SELECT_HIGH_MAX, WB_SELECT_LOW_MAX, WB_SELECT_SHIFT,
};

/// ALU operation selected in the execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// Integer addition.
    Add,

    /// Integer subtraction.
    Sub,

    /// Shift left logical.
    Sll,

    /// Set less than (signed).
    Slt,

    /// Set less than unsigned.
    Sltu,

    /// Bitwise XOR.
    Xor,

    /// Shift right logical.
    Srl,

    /// Shift right arithmetic.
    Sra,

    /// Bitwise OR.
    Or,

    /// Bitwise AND.
    And,

    /// Selector in the default group (below 32) or beyond the 6-bit table.
    #[default]
    Undefined,
}

/// Base group, selected when the variant bit is clear.
const ALU_BASE_GROUP: [AluOp; 8] = [
    AluOp::Add,
    AluOp::Sll,
    AluOp::Slt,
    AluOp::Sltu,
    AluOp::Xor,
    AluOp::Srl,
    AluOp::Or,
    AluOp::And,
];

/// Subtract / arithmetic-shift group, selected when the variant bit is set.
const ALU_VARIANT_GROUP: [AluOp; 8] = [
    AluOp::Sub,
    AluOp::Sll,
    AluOp::Slt,
    AluOp::Sltu,
    AluOp::Xor,
    AluOp::Sra,
    AluOp::Or,
    AluOp::And,
];

impl AluOp {
    /// Decodes the execute-stage ALU selector (`c4`).
    ///
    /// Codes 32–63 select from two 8-entry groups; bit 3 picks the subtract/arithmetic
    /// variant. Codes 48–55 repeat the base group, and 56–63 keep `ADD` in slot 0 with only
    /// the shift switched to `SRA`. Anything else is [`AluOp::Undefined`].
    pub fn from_code(code: u32) -> Self {
        if !(ALU_DEFINED_BASE..ALU_TABLE_LEN).contains(&code) {
            return Self::Undefined;
        }
        let slot = (code & ALU_GROUP_MASK) as usize;
        if code & ALU_VARIANT_BIT == 0 {
            return ALU_BASE_GROUP[slot];
        }
        match ALU_VARIANT_GROUP[slot] {
            Self::Sub if code >= ALU_UPPER_BASE => Self::Add,
            op => op,
        }
    }

    /// Returns `true` if `code` lies outside the 64-entry selector table altogether.
    pub const fn out_of_table(code: u32) -> bool {
        code >= ALU_TABLE_LEN
    }

    /// Short mnemonic used in pipeline views.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Sll => "SLL",
            Self::Slt => "SLT",
            Self::Sltu => "SLTU",
            Self::Xor => "XOR",
            Self::Srl => "SRL",
            Self::Sra => "SRA",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Undefined => "DEF",
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

/// Source for ALU operand A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OperandA {
    /// Use the register file read port 1 value.
    #[default]
    Register,

    /// Use the program counter.
    ProgramCounter,
}

impl OperandA {
    /// Decodes the operand A select (`c3`); any non-zero code selects the PC.
    pub const fn from_code(code: u32) -> Self {
        if code == 0 {
            Self::Register
        } else {
            Self::ProgramCounter
        }
    }
}

impl fmt::Display for OperandA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Register => "RD1",
            Self::ProgramCounter => "PC",
        })
    }
}

/// Source for ALU operand B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OperandB {
    /// Use the register file read port 2 value.
    #[default]
    Register,

    /// Use the sign-extended immediate.
    Immediate,
}

impl OperandB {
    /// Decodes the operand B select (`c2`); any non-zero code selects the immediate.
    pub const fn from_code(code: u32) -> Self {
        if code == 0 {
            Self::Register
        } else {
            Self::Immediate
        }
    }
}

impl fmt::Display for OperandB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Register => "RD2",
            Self::Immediate => "IMM",
        })
    }
}

/// Outcome of the branch unit in the execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BranchOutcome {
    /// No branch taken this cycle.
    #[default]
    NotTaken,

    /// Branch taken.
    Taken,
}

impl From<bool> for BranchOutcome {
    fn from(taken: bool) -> Self {
        if taken { Self::Taken } else { Self::NotTaken }
    }
}

impl fmt::Display for BranchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::NotTaken => "---",
            Self::Taken => "TKN",
        })
    }
}

/// Memory access performed by an instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MemAccess {
    /// No memory operation.
    #[default]
    NoOp,

    /// Store.
    Write,

    /// Load.
    Read,

    /// Read and write selected together.
    Undefined,
}

impl MemAccess {
    /// Packs the write (`c5`) and read (`c6`) selectors into the 2-bit table index.
    pub const fn pack(write: u32, read: u32) -> u32 {
        (((read > 0) as u32) << 1) | (write > 0) as u32
    }

    /// Decodes the write (`c5`) and read (`c6`) selectors.
    pub const fn from_selectors(write: u32, read: u32) -> Self {
        match Self::pack(write, read) {
            0 => Self::NoOp,
            1 => Self::Write,
            2 => Self::Read,
            _ => Self::Undefined,
        }
    }

    /// Returns `true` for the undefined combination.
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for MemAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::NoOp => "NOP",
            Self::Write => "WR",
            Self::Read => "RD",
            Self::Undefined => "UND",
        })
    }
}

/// Value routed to the register file in write-back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WriteBackSource {
    /// Nothing written back.
    #[default]
    NoOp,

    /// ALU result.
    AluResult,

    /// Data read from memory.
    MemoryData,

    /// Return address (link register value for jumps).
    ReturnAddress,

    /// Selector combination outside the table.
    Undefined,
}

impl WriteBackSource {
    /// Packs the low (`c7`) and high (`c9`) selectors into the table index `c7 + (c9 << 2)`.
    ///
    /// Returns `None` if either selector is wider than its field.
    pub const fn pack(low: u32, high: u32) -> Option<u32> {
        if low > WB_SELECT_LOW_MAX || high > WB_SELECT_HIGH_MAX {
            None
        } else {
            Some(low + (high << WB_SELECT_SHIFT))
        }
    }

    /// Decodes the low (`c7`) and high (`c9`) write-back selectors.
    ///
    /// Indices 0–3 are the idle group, 4–6 select a source and 7, like any selector that
    /// overflows its field, is [`WriteBackSource::Undefined`].
    pub const fn from_selectors(low: u32, high: u32) -> Self {
        match Self::pack(low, high) {
            Some(0..=3) => Self::NoOp,
            Some(4) => Self::AluResult,
            Some(5) => Self::MemoryData,
            Some(6) => Self::ReturnAddress,
            _ => Self::Undefined,
        }
    }

    /// Returns `true` for an undefined selector combination.
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for WriteBackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::NoOp => "NOP",
            Self::AluResult => "ALU",
            Self::MemoryData => "RD",
            Self::ReturnAddress => "RET",
            Self::Undefined => "UND",
        })
    }
}

/// Control signals carried by both the execute and memory stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ControlSignals {
    /// Memory access mode.
    pub mem: MemAccess,
    /// Write-back source.
    pub wb: WriteBackSource,
}

impl ControlSignals {
    /// Decodes the memory (`c5`/`c6`) and write-back (`c7`/`c9`) selectors of one stage.
    pub const fn decode(c5: u32, c6: u32, c7: u32, c9: u32) -> Self {
        Self {
            mem: MemAccess::from_selectors(c5, c6),
            wb: WriteBackSource::from_selectors(c7, c9),
        }
    }
}
