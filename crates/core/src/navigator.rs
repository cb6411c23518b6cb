//! Cycle Navigator.
//!
//! This module is the command surface over a decoded trace. It provides:
//! 1. **Cursor Commands:** Step, stall-skipping and jump movement, all total over the trace.
//! 2. **Snapshots:** The cycle at the cursor, the register history up to it and the correlated
//!    disassembly window.
//!
//! The navigator owns the immutable session data; the cursor is its only mutable state.

use tracing::trace;

use crate::common::constants::DEFAULT_LISTING_VIEWPORT;
use crate::disasm::{Listing, Window};
use crate::history::{RegisterHistory, RegisterWriteEvent};
use crate::pipeline::decoder::PipelineCycle;

/// A navigation command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move one cycle forward.
    StepForward,
    /// Move one cycle backward.
    StepBackward,
    /// Move forward past stalled cycles.
    SkipForward,
    /// Move backward past stalled cycles.
    SkipBackward,
    /// Move to the first cycle.
    JumpStart,
    /// Move to the last cycle before the trailer.
    JumpEnd,
    /// End the session. The navigator ignores it.
    Quit,
}

impl Command {
    /// Maps a debugger key binding to its command.
    ///
    /// `w`/`s` step, `e`/`d` skip, `g`/`G` jump to start/end and `q` quits.
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            'w' => Some(Self::StepForward),
            's' => Some(Self::StepBackward),
            'e' => Some(Self::SkipForward),
            'd' => Some(Self::SkipBackward),
            'g' => Some(Self::JumpStart),
            'G' => Some(Self::JumpEnd),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Everything a presentation layer needs for one cursor position.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    /// Cursor position.
    pub cursor: usize,
    /// Decoded cycle at the cursor.
    pub cycle: &'a PipelineCycle,
    /// Register writes committed at or before the cursor.
    pub history: &'a [RegisterWriteEvent],
    /// Disassembly around the instruction being fetched.
    pub disassembly: Window<'a>,
}

impl<'a> Snapshot<'a> {
    /// The last `k` history entries, oldest first.
    pub fn recent_history(&self, k: usize) -> &'a [RegisterWriteEvent] {
        &self.history[self.history.len().saturating_sub(k)..]
    }
}

/// Cursor over a decoded trace.
#[derive(Clone, Debug)]
pub struct CycleNavigator {
    cycles: Vec<PipelineCycle>,
    history: RegisterHistory,
    listing: Listing,
    cursor: usize,
    window_height: usize,
}

impl CycleNavigator {
    /// Creates a navigator positioned at cycle 0.
    ///
    /// Returns `None` if `cycles` is empty; every session has at least one cycle.
    pub fn new(
        cycles: Vec<PipelineCycle>,
        history: RegisterHistory,
        listing: Listing,
    ) -> Option<Self> {
        if cycles.is_empty() {
            return None;
        }
        Some(Self {
            cycles,
            history,
            listing,
            cursor: 0,
            window_height: DEFAULT_LISTING_VIEWPORT,
        })
    }

    /// Sets the number of disassembly lines in each snapshot.
    #[must_use]
    pub fn with_window_height(mut self, height: usize) -> Self {
        self.window_height = height;
        self
    }

    /// Current cursor.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of cycles in the trace.
    pub const fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Always `false`; a navigator holds at least one cycle.
    pub const fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// All decoded cycles.
    pub fn cycles(&self) -> &[PipelineCycle] {
        &self.cycles
    }

    /// The full register history.
    pub const fn history(&self) -> &RegisterHistory {
        &self.history
    }

    /// The disassembly listing.
    pub const fn listing(&self) -> &Listing {
        &self.listing
    }

    const fn last(&self) -> usize {
        self.cycles.len().saturating_sub(1)
    }

    fn is_stalled_at(&self, idx: usize) -> bool {
        self.cycles.get(idx).is_some_and(PipelineCycle::is_stalled)
    }

    /// Applies `cmd` and returns the new cursor.
    pub fn apply(&mut self, cmd: Command) -> usize {
        match cmd {
            Command::StepForward => self.step_forward(),
            Command::StepBackward => self.step_backward(),
            Command::SkipForward => self.skip_forward(),
            Command::SkipBackward => self.skip_backward(),
            Command::JumpStart => self.jump_start(),
            Command::JumpEnd => self.jump_end(),
            Command::Quit => {}
        }
        trace!(?cmd, cursor = self.cursor, "command applied");
        self.cursor
    }

    /// Moves one cycle forward; no-op on the last cycle.
    pub const fn step_forward(&mut self) {
        if self.cursor < self.last() {
            self.cursor += 1;
        }
    }

    /// Moves one cycle backward; no-op on cycle 0.
    pub const fn step_backward(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Steps forward at least once, then past stalled cycles.
    ///
    /// Stops on the first retired cycle or on the last cycle, whatever its status.
    pub fn skip_forward(&mut self) {
        if self.cursor >= self.last() {
            return;
        }
        self.cursor += 1;
        while self.cursor < self.last() && self.is_stalled_at(self.cursor) {
            self.cursor += 1;
        }
    }

    /// Steps backward at least once, then past stalled cycles, stopping at cycle 0.
    pub fn skip_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        while self.cursor > 0 && self.is_stalled_at(self.cursor) {
            self.cursor -= 1;
        }
    }

    /// Moves to cycle 0.
    pub const fn jump_start(&mut self) {
        self.cursor = 0;
    }

    /// Moves to the second-to-last cycle; the last one is the pipeline flush trailer.
    pub const fn jump_end(&mut self) {
        self.cursor = self.cycles.len().saturating_sub(2);
    }

    /// Program counter correlated with the cursor.
    ///
    /// The fetch stage runs one cycle ahead of what is displayed, so cycle `c` shows the
    /// instruction fetched in cycle `c - 1`.
    pub fn correlated_pc(&self) -> u32 {
        let idx = self.cursor.saturating_sub(1);
        self.cycles.get(idx).map_or(0, |c| c.fetch.pc)
    }

    /// Builds the view for the current cursor.
    pub fn snapshot(&self) -> Snapshot<'_> {
        let cycle = &self.cycles[self.cursor.min(self.last())];
        Snapshot {
            cursor: self.cursor,
            cycle,
            history: self.history.up_to(self.cursor),
            disassembly: self.listing.window(self.correlated_pc(), self.window_height),
        }
    }
}
