//! Trace statistics collection and reporting.
//!
//! This module summarizes a decoded trace. It provides:
//! 1. **Cycle Status:** Retired and stalled cycle counts.
//! 2. **Stalls:** Per-cause stall counts (a cycle can have several causes).
//! 3. **Register Writes:** Committed writes and the most written register.
//! 4. **Anomalies:** Undefined control codes met while decoding.

use std::io::{self, Write};

use crate::common::constants::NUM_REGS;
use crate::common::reg::abi_name;
use crate::history::RegisterHistory;
use crate::pipeline::decoder::{PipelineCycle, StallCause};

/// Section names for selective stats output.
///
/// Pass an empty slice to [`TraceStats::write_sections`] to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "stalls", "registers", "anomalies"];

const RULE: &str = "----------------------------------------------------------";
const BANNER: &str = "==========================================================";

/// Whole-trace summary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Total cycles in the trace.
    pub cycles: usize,
    /// Cycles classified as retired.
    pub retired: usize,
    /// Cycles classified as stalled.
    pub stalled: usize,

    /// Cycles with the data hazard flag set.
    pub stalls_data: usize,
    /// Cycles with the branch hazard flag set.
    pub stalls_branch: usize,
    /// Cycles where instruction fetch did not complete.
    pub stalls_icache: usize,
    /// Cycles where data fetch did not complete.
    pub stalls_dcache: usize,

    /// Committed register writes.
    pub register_writes: usize,
    /// Writes per register.
    pub writes_per_reg: [usize; NUM_REGS],

    /// Undefined control codes across the trace.
    pub anomalies: usize,
}

impl TraceStats {
    /// Collects statistics for a decoded trace and its history.
    pub fn collect(cycles: &[PipelineCycle], history: &RegisterHistory) -> Self {
        let mut stats = Self {
            cycles: cycles.len(),
            register_writes: history.len(),
            ..Self::default()
        };

        for cycle in cycles {
            if cycle.is_stalled() {
                stats.stalled += 1;
            } else {
                stats.retired += 1;
            }
            for cause in cycle.stall_causes() {
                match cause {
                    StallCause::DataHazard => stats.stalls_data += 1,
                    StallCause::BranchHazard => stats.stalls_branch += 1,
                    StallCause::InstructionCacheMiss => stats.stalls_icache += 1,
                    StallCause::DataCacheMiss => stats.stalls_dcache += 1,
                }
            }
            stats.anomalies += cycle.anomalies.len();
        }

        for event in history {
            if let Some(count) = stats.writes_per_reg.get_mut(event.reg) {
                *count += 1;
            }
        }

        stats
    }

    /// Register with the most writes, if any register was written. Lowest index wins ties.
    pub fn busiest_register(&self) -> Option<(usize, usize)> {
        self.writes_per_reg
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, n)| n > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    }

    /// Prints all sections to stdout.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to stdout.
    pub fn print(&self) -> io::Result<()> {
        self.write_sections(&mut io::stdout().lock(), &[])
    }

    /// Writes only the requested sections.
    ///
    /// # Arguments
    ///
    /// * `out` - Destination.
    /// * `sections` - Names from [`STATS_SECTIONS`], or empty for all.
    ///
    /// # Errors
    ///
    /// Returns any error from `out`.
    pub fn write_sections<W: Write>(&self, out: &mut W, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1);

        if want("summary") {
            writeln!(out, "\n{BANNER}")?;
            writeln!(out, "PIPELINE TRACE STATISTICS")?;
            writeln!(out, "{BANNER}")?;
            writeln!(out, "trace_cycles             {}", self.cycles)?;
            writeln!(
                out,
                "cycles.retired           {} ({:.2}%)",
                self.retired,
                percent(self.retired, cyc)
            )?;
            writeln!(
                out,
                "cycles.stalled           {} ({:.2}%)",
                self.stalled,
                percent(self.stalled, cyc)
            )?;
            writeln!(out, "{RULE}")?;
        }
        if want("stalls") {
            writeln!(out, "STALL CAUSES")?;
            for (name, count) in [
                ("stalls.data", self.stalls_data),
                ("stalls.branch", self.stalls_branch),
                ("stalls.icache", self.stalls_icache),
                ("stalls.dcache", self.stalls_dcache),
            ] {
                writeln!(out, "  {name:<22} {count} ({:.2}%)", percent(count, cyc))?;
            }
            writeln!(out, "{RULE}")?;
        }
        if want("registers") {
            writeln!(out, "REGISTER WRITES")?;
            writeln!(out, "  writes.total           {}", self.register_writes)?;
            if let Some((reg, count)) = self.busiest_register() {
                writeln!(out, "  writes.busiest         {} ({count})", abi_name(reg))?;
            }
            writeln!(out, "{RULE}")?;
        }
        if want("anomalies") {
            writeln!(out, "DECODE ANOMALIES")?;
            writeln!(out, "  undefined_codes        {}", self.anomalies)?;
            writeln!(out, "{RULE}")?;
        }
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, total: usize) -> f64 {
    (part as f64 / total as f64) * 100.0
}
