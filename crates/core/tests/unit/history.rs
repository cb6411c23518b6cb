//! Register History Tests.
//!
//! Verifies the commit log derived from decoded cycles:
//!   1. Only enabled, non-x0 writes on cycles where fetch and decode advanced
//!   2. Writes of an unchanged value are dropped
//!   3. Cycle 0 seeds values and never produces an event
//!   4. `up_to` and `for_register` queries

use pretty_assertions::assert_eq;

use crate::common::builder::{CycleBuilder, decoded, quiet};
use pipetrace_core::history::{RegisterHistory, RegisterWriteEvent};

fn event(cycle: usize, reg: usize, old: u32, new: u32) -> RegisterWriteEvent {
    RegisterWriteEvent {
        cycle,
        reg,
        old,
        new,
    }
}

#[test]
fn test_no_write_back_enable_no_events() {
    let cycles = decoded(vec![
        CycleBuilder::new(),
        CycleBuilder::new().reg(3, 9).write_back_disabled(3, 9),
        CycleBuilder::new().reg(3, 9).reg(4, 1),
    ]);
    assert!(RegisterHistory::build(&cycles).is_empty());
}

#[test]
fn test_single_committed_write() {
    let mut builders = quiet(6, 0x100);
    builders[4] = CycleBuilder::new().pc(0x110).write_back(5, 0x555);
    let history = RegisterHistory::build(&decoded(builders));
    assert_eq!(history.events(), &[event(4, 5, 0, 0x555)]);
}

#[test]
fn test_writes_to_x0_are_ignored() {
    let mut builders = quiet(3, 0);
    builders[1] = CycleBuilder::new().write_back(0, 0x1234);
    assert!(RegisterHistory::build(&decoded(builders)).is_empty());
}

#[test]
fn test_stalled_front_end_gates_writes() {
    let builders = vec![
        CycleBuilder::new(),
        CycleBuilder::new().write_back(6, 1).icache_miss(),
        CycleBuilder::new().write_back(6, 1).dcache_miss(),
        CycleBuilder::new().write_back(6, 1),
    ];
    let history = RegisterHistory::build(&decoded(builders));
    assert_eq!(history.events(), &[event(3, 6, 0, 1)]);
}

#[test]
fn test_hazards_do_not_gate_writes() {
    let builders = vec![
        CycleBuilder::new(),
        CycleBuilder::new().write_back(7, 2).data_hazard(),
    ];
    let history = RegisterHistory::build(&decoded(builders));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_repeated_value_is_dropped() {
    let builders = vec![
        CycleBuilder::new(),
        CycleBuilder::new().write_back(8, 5),
        CycleBuilder::new().write_back(8, 5),
        CycleBuilder::new().write_back(8, 6),
    ];
    let history = RegisterHistory::build(&decoded(builders));
    assert_eq!(
        history.events(),
        &[event(1, 8, 0, 5), event(3, 8, 5, 6)]
    );
}

#[test]
fn test_cycle_zero_seeds_tracked_values() {
    let builders = vec![
        CycleBuilder::new().reg(9, 0x40).write_back(9, 0x99),
        CycleBuilder::new().write_back(9, 0x40),
        CycleBuilder::new().write_back(9, 0x41),
    ];
    let history = RegisterHistory::build(&decoded(builders));
    assert_eq!(history.events(), &[event(2, 9, 0x40, 0x41)]);
}

#[test]
fn test_old_value_comes_from_last_write() {
    let builders = vec![
        CycleBuilder::new(),
        CycleBuilder::new().write_back(10, 1),
        CycleBuilder::new().write_back(11, 2),
        CycleBuilder::new().write_back(10, 3),
    ];
    let history = RegisterHistory::build(&decoded(builders));
    let a0: Vec<_> = history.for_register(10).copied().collect();
    assert_eq!(a0, vec![event(1, 10, 0, 1), event(3, 10, 1, 3)]);
    assert_eq!(history.for_register(11).count(), 1);
    assert_eq!(history.for_register(12).count(), 0);
}

#[test]
fn test_up_to_is_inclusive() {
    let builders = vec![
        CycleBuilder::new(),
        CycleBuilder::new().write_back(1, 1),
        CycleBuilder::new(),
        CycleBuilder::new().write_back(2, 2),
        CycleBuilder::new().write_back(3, 3),
    ];
    let history = RegisterHistory::build(&decoded(builders));
    assert_eq!(history.up_to(0).len(), 0);
    assert_eq!(history.up_to(1).len(), 1);
    assert_eq!(history.up_to(2).len(), 1);
    assert_eq!(history.up_to(3).len(), 2);
    assert_eq!(history.up_to(100).len(), 3);
}

#[test]
fn test_rebuild_is_identical() {
    let mut builders = quiet(8, 0x80);
    builders[2] = CycleBuilder::new().write_back(4, 0xaa);
    builders[5] = CycleBuilder::new().write_back(4, 0xbb);
    let cycles = decoded(builders);
    assert_eq!(RegisterHistory::build(&cycles), RegisterHistory::build(&cycles));
}

#[test]
fn test_empty_trace_has_empty_history() {
    assert!(RegisterHistory::build(&[]).is_empty());
}

#[test]
fn test_event_display_uses_abi_name() {
    assert_eq!(event(4, 5, 0, 0x555).to_string(), "<t0>: 00000000 -> 00000555");
}
