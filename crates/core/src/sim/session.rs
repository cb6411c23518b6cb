//! Debugging Session.
//!
//! This module assembles a ready [`CycleNavigator`] from a trace and a disassembly listing.
//! It performs:
//! 1. **Loading:** Trace text from the simulator, a string or a file.
//! 2. **Derivation:** Decoding every cycle and building the register history once.
//! 3. **Correlation Setup:** Parsing the listing the navigator correlates against.
//!
//! Construction either succeeds completely or fails with a fatal [`TraceError`].

use std::path::Path;

use tracing::info;

use crate::common::error::{Result, TraceError};
use crate::config::Config;
use crate::disasm::Listing;
use crate::history::RegisterHistory;
use crate::navigator::CycleNavigator;
use crate::pipeline::decoder::decode_all;
use crate::sim::acquire::Acquisition;
use crate::trace::loader;
use crate::trace::raw::RawCycle;

/// A loaded trace ready for navigation.
#[derive(Clone, Debug)]
pub struct Session {
    navigator: CycleNavigator,
    config: Config,
}

impl Session {
    /// Builds a session from already parsed records.
    ///
    /// # Errors
    ///
    /// [`TraceError::EmptyTrace`] if `raw` is empty.
    pub fn from_records(raw: &[RawCycle], listing: Listing, config: Config) -> Result<Self> {
        let cycles = decode_all(raw);
        let history = RegisterHistory::build(&cycles);
        let anomalies: usize = cycles.iter().map(|c| c.anomalies.len()).sum();

        let navigator = CycleNavigator::new(cycles, history, listing)
            .ok_or(TraceError::EmptyTrace)?
            .with_window_height(config.listing_viewport);

        info!(
            cycles = navigator.len(),
            writes = navigator.history().len(),
            anomalies,
            "session ready"
        );
        Ok(Self { navigator, config })
    }

    /// Builds a session from trace and listing text.
    ///
    /// # Errors
    ///
    /// [`TraceError::MalformedTrace`] or [`TraceError::EmptyTrace`] for bad trace text.
    pub fn from_text(trace: &str, listing: &str, config: Config) -> Result<Self> {
        let raw = loader::load(&loader::normalize(trace))?;
        Self::from_records(&raw, Listing::parse(listing), config)
    }

    /// Builds a session from a saved trace and a listing file.
    ///
    /// # Errors
    ///
    /// [`TraceError::Io`] if either file cannot be read, otherwise as for [`Session::from_text`].
    pub fn from_files(trace: &Path, listing: &Path, config: Config) -> Result<Self> {
        let raw = loader::load_file(trace)?;
        let listing = Listing::load(listing)?;
        Self::from_records(&raw, listing, config)
    }

    /// Runs the simulator under the configured timeout and builds a session from its output.
    ///
    /// # Arguments
    ///
    /// * `program` - Simulator executable.
    /// * `args` - Simulator arguments (typically the program image and trace flags).
    /// * `listing` - Disassembly of the simulated program.
    /// * `config` - Session settings; `acquisition_timeout_ms` bounds the run.
    ///
    /// # Errors
    ///
    /// Any acquisition error from [`Acquisition::run`], [`TraceError::Io`] for the listing,
    /// and the trace errors of [`Session::from_text`].
    pub fn acquire(program: &str, args: &[String], listing: &Path, config: Config) -> Result<Self> {
        let listing = Listing::load(listing)?;
        let output = Acquisition::run(program, args, config.timeout())?;
        let raw = loader::load(&output)?;
        Self::from_records(&raw, listing, config)
    }

    /// The navigator.
    pub const fn navigator(&self) -> &CycleNavigator {
        &self.navigator
    }

    /// The navigator, for issuing commands.
    pub const fn navigator_mut(&mut self) -> &mut CycleNavigator {
        &mut self.navigator
    }

    /// The settings the session was built with.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Consumes the session, returning its navigator.
    pub fn into_navigator(self) -> CycleNavigator {
        self.navigator
    }
}
