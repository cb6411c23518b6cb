//! Register File Snapshot.
//!
//! This module provides the `RegisterFile` struct, which holds the 32 general-purpose register
//! values captured in one trace record. It provides:
//! 1. **Fixed Storage:** Values indexed by register number rather than by record key.
//! 2. **Invariant Enforcement:** Register `x0` always reads as zero, whatever the trace says.
//! 3. **Deserialization:** Collects the flat `x0`..`x31` record keys into the array.
//! 4. **Observability:** ABI names and a four-per-row text layout.

use std::fmt;

use serde::Deserialize;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};

use super::constants::{NUM_REGS, ZERO_REG};

/// ABI register names for x0–x31.
const REG_NAMES: [&str; NUM_REGS] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Returns the ABI name for an integer register index, or `"x??"` when out of range.
#[inline]
pub fn abi_name(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("x??")
}

/// Register file values captured in a single cycle.
///
/// Register `x0` is hard-wired to zero: it is stored as zero regardless of the
/// value present in the trace and reads always return zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; NUM_REGS],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with all registers set to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_REGS],
        }
    }

    /// Creates a register file from raw values; the `x0` entry is discarded.
    pub const fn from_values(mut regs: [u32; NUM_REGS]) -> Self {
        regs[ZERO_REG] = 0;
        Self { regs }
    }

    /// Reads a register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Out-of-range indices and `x0` read as 0.
    pub fn read(&self, idx: usize) -> u32 {
        if idx == ZERO_REG {
            0
        } else {
            self.regs.get(idx).copied().unwrap_or(0)
        }
    }

    /// Writes a register value. Writes to `x0` and out-of-range indices are ignored.
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != ZERO_REG
            && let Some(slot) = self.regs.get_mut(idx)
        {
            *slot = val;
        }
    }

    /// Returns all register values in index order.
    pub const fn values(&self) -> &[u32; NUM_REGS] {
        &self.regs
    }
}

impl fmt::Display for RegisterFile {
    /// Formats the register file four registers per row, labelled with ABI names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.regs.chunks(4).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, val) in chunk.iter().enumerate() {
                if col > 0 {
                    f.write_str("  ")?;
                }
                write!(f, "{:>4} {val:08x}", abi_name(row * 4 + col))?;
            }
        }
        Ok(())
    }
}

/// Parses a record key of the form `x<N>` into a register index.
fn parse_reg_key(key: &str) -> Option<usize> {
    let digits = key.strip_prefix('x')?;
    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|&idx| idx < NUM_REGS)
}

impl<'de> Deserialize<'de> for RegisterFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RegisterVisitor;

        impl<'de> Visitor<'de> for RegisterVisitor {
            type Value = RegisterFile;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("register values keyed `x0` through `x31`")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut seen = [None; NUM_REGS];
                while let Some(key) = map.next_key::<String>()? {
                    let Some(idx) = parse_reg_key(&key) else {
                        let _ = map.next_value::<IgnoredAny>()?;
                        continue;
                    };
                    if seen[idx].replace(map.next_value::<u32>()?).is_some() {
                        return Err(de::Error::custom(format!("duplicate register `{key}`")));
                    }
                }

                let mut regs = [0u32; NUM_REGS];
                for (idx, (slot, value)) in regs.iter_mut().zip(seen).enumerate() {
                    *slot = value
                        .ok_or_else(|| de::Error::custom(format!("missing register `x{idx}`")))?;
                }
                Ok(RegisterFile::from_values(regs))
            }
        }

        deserializer.deserialize_map(RegisterVisitor)
    }
}
