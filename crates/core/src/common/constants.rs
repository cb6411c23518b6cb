//! Global Trace Constants.
//!
//! This module defines constants shared by the trace loader, decoder and navigator. It includes:
//! 1. **Register Constants:** Register file size and the hard-wired zero register.
//! 2. **Decode Table Constants:** Bounds and shifts of the packed control-signal tables.
//! 3. **Session Constants:** Defaults for acquisition and presentation viewports.

/// Number of general-purpose registers in the traced core.
pub const NUM_REGS: usize = 32;

/// Index of the hard-wired zero register (`x0`).
pub const ZERO_REG: usize = 0;

/// First ALU selector code that belongs to a defined operation group.
///
/// Codes below this value form the default group and decode to `Undefined`.
pub const ALU_DEFINED_BASE: u32 = 32;

/// Number of entries in the packed ALU selector table (6-bit code).
pub const ALU_TABLE_LEN: u32 = 64;

/// Mask selecting the operation within an 8-entry ALU group.
pub const ALU_GROUP_MASK: u32 = 0x7;

/// Bit that selects the subtract / arithmetic-shift ALU group.
pub const ALU_VARIANT_BIT: u32 = 0x8;

/// First code of the upper half of the ALU table, where the variant bit only selects `SRA`.
pub const ALU_UPPER_BASE: u32 = 48;

/// Shift applied to the high write-back selector (`c9`) when packing the write-back source.
pub const WB_SELECT_SHIFT: u32 = 2;

/// Largest valid value of the low write-back selector (`c7`).
pub const WB_SELECT_LOW_MAX: u32 = 3;

/// Largest valid value of the high write-back selector (`c9`).
pub const WB_SELECT_HIGH_MAX: u32 = 1;

/// Default time allowed for the simulator to emit a complete trace, in milliseconds.
pub const DEFAULT_ACQUISITION_TIMEOUT_MS: u64 = 1000;

/// Default number of register-history entries shown by a presentation layer.
pub const DEFAULT_HISTORY_VIEWPORT: usize = 16;

/// Default number of disassembly lines shown by a presentation layer.
pub const DEFAULT_LISTING_VIEWPORT: usize = 15;
