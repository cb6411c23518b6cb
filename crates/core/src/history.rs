//! Register Write History.
//!
//! This module derives a chronological log of committed register writes from decoded cycles.
//! It provides:
//! 1. **Construction:** A single pass with an explicit last-seen accumulator seeded from cycle 0.
//! 2. **Commit Gating:** Only write-back-enabled, non-`x0` writes on cycles where the fetch and
//!    decode paths advanced, and only when the value actually changes.
//! 3. **Queries:** Binary-searched "events up to cycle N" lookups for cursor movement.

use std::fmt;

use tracing::debug;

use crate::common::constants::{NUM_REGS, ZERO_REG};
use crate::common::reg::{RegisterFile, abi_name};
use crate::pipeline::decoder::PipelineCycle;

/// A committed change to one register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegisterWriteEvent {
    /// Cycle in which write-back committed the value (always at least 1).
    pub cycle: usize,
    /// Destination register (1-31).
    pub reg: usize,
    /// Value before the write.
    pub old: u32,
    /// Value after the write.
    pub new: u32,
}

impl fmt::Display for RegisterWriteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}>: {:08x} -> {:08x}",
            abi_name(self.reg),
            self.old,
            self.new
        )
    }
}

/// Last value seen for every register during one build pass.
struct LastSeen {
    regs: RegisterFile,
}

impl LastSeen {
    const fn seed(regs: RegisterFile) -> Self {
        Self { regs }
    }

    /// Records `value` for `reg`, returning the previous value if it changed.
    fn update(&mut self, reg: usize, value: u32) -> Option<u32> {
        let old = self.regs.read(reg);
        if old == value {
            return None;
        }
        self.regs.write(reg, value);
        Some(old)
    }
}

/// Ordered log of register writes for a whole trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterHistory {
    events: Vec<RegisterWriteEvent>,
}

impl RegisterHistory {
    /// Builds the history for a decoded trace.
    ///
    /// Cycle 0 only seeds the tracked register values. Every later cycle contributes an event
    /// when write-back is enabled for a destination other than `x0`, the fetch and decode paths
    /// both advanced, and the written value differs from the tracked one. Register-file changes
    /// without write-back enable are ignored.
    pub fn build(cycles: &[PipelineCycle]) -> Self {
        let Some((first, rest)) = cycles.split_first() else {
            return Self::default();
        };

        let mut last_seen = LastSeen::seed(first.regs);
        let mut events = Vec::new();

        for cycle in rest {
            let wb = &cycle.write_back;
            let reg = wb.rd as usize;
            if !wb.enable || reg == ZERO_REG || reg >= NUM_REGS || !cycle.front_end_advanced() {
                continue;
            }
            if let Some(old) = last_seen.update(reg, wb.value) {
                events.push(RegisterWriteEvent {
                    cycle: cycle.index,
                    reg,
                    old,
                    new: wb.value,
                });
            }
        }

        debug!(events = events.len(), "register history built");
        Self { events }
    }

    /// All events, in cycle order.
    pub fn events(&self) -> &[RegisterWriteEvent] {
        &self.events
    }

    /// Events committed at or before `cycle`.
    pub fn up_to(&self, cycle: usize) -> &[RegisterWriteEvent] {
        let end = self.events.partition_point(|e| e.cycle <= cycle);
        &self.events[..end]
    }

    /// Events that wrote `reg`, in cycle order.
    pub fn for_register(&self, reg: usize) -> impl Iterator<Item = &RegisterWriteEvent> + '_ {
        self.events.iter().filter(move |e| e.reg == reg)
    }

    /// Number of events.
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no register was ever written.
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over all events in cycle order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegisterWriteEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a RegisterHistory {
    type Item = &'a RegisterWriteEvent;
    type IntoIter = std::slice::Iter<'a, RegisterWriteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
