//! Plain-text rendering of a navigator snapshot.
//!
//! Lays out one cycle the way the interactive debugger shows it: registers, status line,
//! pipeline latches with decoded controls, recent register writes and the disassembly window.

use std::io::{self, Write};

use pipetrace_core::Snapshot;
use pipetrace_core::common::abi_name;
use pipetrace_core::pipeline::PipelineCycle;

const RULE: &str = "------------------------------------------------------------------";

/// Writes `snap` to `out`, showing at most `history` register writes.
pub fn snapshot<W: Write>(
    out: &mut W,
    snap: &Snapshot<'_>,
    total: usize,
    history: usize,
) -> io::Result<()> {
    let cycle = snap.cycle;

    writeln!(out, "{RULE}")?;
    writeln!(out, "cycle {}/{}  status: {}", snap.cursor, total.saturating_sub(1), status(cycle))?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{}", cycle.regs)?;
    writeln!(out, "{RULE}")?;
    latches(out, cycle)?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "register writes:")?;
    for event in snap.recent_history(history) {
        writeln!(out, "  [{:>6}] {event}", event.cycle)?;
    }
    writeln!(out, "{RULE}")?;

    let window = snap.disassembly;
    if let Some(miss) = window.miss() {
        writeln!(out, "disassembly: {miss}")?;
    }
    for (idx, line) in window.lines().iter().enumerate() {
        let marker = if window.highlight() == Some(idx) { "->" } else { "  " };
        writeln!(out, "{marker} {}", line.text)?;
    }
    Ok(())
}

fn status(cycle: &PipelineCycle) -> String {
    let causes = cycle.stall_causes();
    if causes.is_empty() {
        return "OK".to_owned();
    }
    causes
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(" ")
}

fn flag(on: bool) -> &'static str {
    if on { "on " } else { "off" }
}

fn latches<W: Write>(out: &mut W, c: &PipelineCycle) -> io::Result<()> {
    let ex = &c.execute;
    let ma = &c.memory;
    let wb = &c.write_back;

    writeln!(out, "IF  pc  {:08x}", c.fetch.pc)?;
    writeln!(
        out,
        "ID  pc  {:08x}  ir  {:08x}  ret {:08x}",
        c.decode.pc, c.decode.ir, c.decode.ret
    )?;
    writeln!(
        out,
        "EX  pc  {:08x}  rd1 {:08x}  rd2 {:08x}  imm {:08x}  ret {:08x}",
        ex.pc, ex.rd1, ex.rd2, ex.imm, ex.ret
    )?;
    writeln!(
        out,
        "    AL {:<4} A {:<3} B {:<3} BR {}  RW {:<3} WB {:<3}  raw {:?}",
        ex.alu,
        ex.a_src,
        ex.b_src,
        ex.branch,
        ex.ctrl.mem,
        ex.ctrl.wb,
        ex.controls.as_array()
    )?;
    writeln!(
        out,
        "MA  alu {:08x}  rd2 {:08x}  ret {:08x}  rd  {:<4}  RW {:<3} WB {:<3}",
        ma.alu,
        ma.rd2,
        ma.ret,
        abi_name(ma.rd as usize),
        ma.ctrl.mem,
        ma.ctrl.wb
    )?;
    writeln!(
        out,
        "WB  en  {}  rd  {:<4}  val {:08x}",
        flag(wb.enable),
        abi_name(wb.rd as usize),
        wb.value
    )?;

    let enables: Vec<String> = c
        .enables
        .labelled()
        .iter()
        .map(|(label, on)| format!("{label} {}", flag(*on)))
        .collect();
    writeln!(out, "CE  {}", enables.join("  "))?;

    let msgs = &c.messages;
    for (name, text) in [
        ("icache", &msgs.icache),
        ("dcache", &msgs.dcache),
        ("memory", &msgs.memory),
        ("fsb", &msgs.fsb),
    ] {
        if !text.is_empty() {
            writeln!(out, "{name:<6} {text}")?;
        }
    }
    for anomaly in &c.anomalies {
        writeln!(out, "warn   {anomaly}")?;
    }
    Ok(())
}
