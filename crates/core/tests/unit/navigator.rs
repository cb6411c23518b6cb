//! Cycle Navigator Tests.
//!
//! Verifies cursor commands and snapshots:
//!   1. Step commands are no-ops at the boundaries
//!   2. Skip commands pass stalled cycles and stop at the boundaries
//!   3. Jump commands, including the one-cycle trace
//!   4. Key bindings
//!   5. Snapshot contents and the one-cycle fetch offset

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::{CycleBuilder, LISTING, decoded, quiet};
use pipetrace_core::disasm::Listing;
use pipetrace_core::history::RegisterHistory;
use pipetrace_core::{Command, CycleNavigator};

fn navigator(builders: Vec<CycleBuilder>) -> CycleNavigator {
    let cycles = decoded(builders);
    let history = RegisterHistory::build(&cycles);
    CycleNavigator::new(cycles, history, Listing::parse(LISTING)).unwrap()
}

/// Retired at 0, 3 and 6; stalled elsewhere.
fn with_stalls() -> CycleNavigator {
    navigator(
        (0..8)
            .map(|i| {
                if matches!(i, 0 | 3 | 6) {
                    CycleBuilder::new()
                } else {
                    CycleBuilder::new().data_hazard()
                }
            })
            .collect(),
    )
}

#[test]
fn test_empty_trace_has_no_navigator() {
    let nav = CycleNavigator::new(Vec::new(), RegisterHistory::default(), Listing::default());
    assert!(nav.is_none());
}

#[test]
fn test_starts_at_zero() {
    assert_eq!(navigator(quiet(3, 0)).cursor(), 0);
}

#[test]
fn test_step_boundaries() {
    let mut nav = navigator(quiet(3, 0));
    assert_eq!(nav.apply(Command::StepBackward), 0);
    assert_eq!(nav.apply(Command::StepForward), 1);
    assert_eq!(nav.apply(Command::StepForward), 2);
    assert_eq!(nav.apply(Command::StepForward), 2);
    assert_eq!(nav.apply(Command::StepBackward), 1);
}

#[test]
fn test_skip_forward_passes_stalls() {
    let mut nav = with_stalls();
    assert_eq!(nav.apply(Command::SkipForward), 3);
    assert_eq!(nav.apply(Command::SkipForward), 6);
    assert_eq!(nav.apply(Command::SkipForward), 7);
    assert_eq!(nav.apply(Command::SkipForward), 7);
}

#[test]
fn test_skip_forward_moves_off_retired_cycle() {
    let mut nav = navigator(quiet(4, 0));
    assert_eq!(nav.apply(Command::SkipForward), 1);
}

#[test]
fn test_skip_backward_passes_stalls() {
    let mut nav = with_stalls();
    let _ = nav.apply(Command::JumpEnd);
    assert_eq!(nav.cursor(), 6);
    assert_eq!(nav.apply(Command::SkipBackward), 3);
    assert_eq!(nav.apply(Command::SkipBackward), 0);
    assert_eq!(nav.apply(Command::SkipBackward), 0);
}

#[test]
fn test_skip_backward_stops_at_zero_when_stalled() {
    let mut nav = navigator(vec![
        CycleBuilder::new().data_hazard(),
        CycleBuilder::new().data_hazard(),
        CycleBuilder::new(),
    ]);
    let _ = nav.apply(Command::StepForward);
    let _ = nav.apply(Command::StepForward);
    assert_eq!(nav.apply(Command::SkipBackward), 0);
}

#[rstest]
#[case(1, 0)]
#[case(2, 0)]
#[case(3, 1)]
#[case(10, 8)]
fn test_jump_end(#[case] len: usize, #[case] expected: usize) {
    let mut nav = navigator(quiet(len, 0));
    assert_eq!(nav.apply(Command::JumpEnd), expected);
    assert_eq!(nav.apply(Command::JumpStart), 0);
}

#[test]
fn test_single_cycle_trace_is_total() {
    let mut nav = navigator(quiet(1, 0));
    for cmd in [
        Command::StepForward,
        Command::StepBackward,
        Command::SkipForward,
        Command::SkipBackward,
        Command::JumpStart,
        Command::JumpEnd,
        Command::Quit,
    ] {
        assert_eq!(nav.apply(cmd), 0);
    }
}

#[test]
fn test_quit_leaves_cursor() {
    let mut nav = navigator(quiet(5, 0));
    let _ = nav.apply(Command::StepForward);
    assert_eq!(nav.apply(Command::Quit), 1);
}

#[rstest]
#[case('w', Some(Command::StepForward))]
#[case('s', Some(Command::StepBackward))]
#[case('e', Some(Command::SkipForward))]
#[case('d', Some(Command::SkipBackward))]
#[case('g', Some(Command::JumpStart))]
#[case('G', Some(Command::JumpEnd))]
#[case('q', Some(Command::Quit))]
#[case('x', None)]
#[case('W', None)]
fn test_key_bindings(#[case] key: char, #[case] cmd: Option<Command>) {
    assert_eq!(Command::from_key(key), cmd);
}

#[test]
fn test_snapshot_history_follows_cursor() {
    let mut builders = quiet(6, 0xf8);
    builders[2] = CycleBuilder::new().write_back(5, 1);
    builders[4] = CycleBuilder::new().write_back(6, 2);
    let mut nav = navigator(builders);

    assert!(nav.snapshot().history.is_empty());
    let _ = nav.apply(Command::StepForward);
    let _ = nav.apply(Command::StepForward);
    assert_eq!(nav.snapshot().history.len(), 1);
    let _ = nav.apply(Command::JumpEnd);
    let snap = nav.snapshot();
    assert_eq!(snap.history.len(), 2);
    assert_eq!(snap.recent_history(1)[0].reg, 6);
    assert_eq!(snap.recent_history(10).len(), 2);
    assert!(snap.recent_history(0).is_empty());
}

#[test]
fn test_snapshot_correlates_previous_fetch() {
    let builders = vec![
        CycleBuilder::new().pc(0xf8),
        CycleBuilder::new().pc(0x100),
        CycleBuilder::new().pc(0x108),
    ];
    let mut nav = navigator(builders).with_window_height(3);

    let snap = nav.snapshot();
    assert_eq!(snap.cycle.index, 0);
    assert_eq!(snap.disassembly.highlighted().and_then(|l| l.address), Some(0xf8));

    let _ = nav.apply(Command::StepForward);
    assert_eq!(nav.correlated_pc(), 0xf8);
    let _ = nav.apply(Command::StepForward);
    let snap = nav.snapshot();
    assert_eq!(snap.cursor, 2);
    assert_eq!(snap.disassembly.highlighted().and_then(|l| l.address), Some(0x100));
    assert_eq!(snap.disassembly.lines().len(), 3);
}

#[test]
fn test_snapshot_reports_miss() {
    let mut nav = navigator(vec![CycleBuilder::new().pc(0x4000); 2]);
    let _ = nav.apply(Command::StepForward);
    let snap = nav.snapshot();
    assert!(snap.disassembly.miss().is_some());
    assert_eq!(snap.disassembly.highlight(), None);
}
