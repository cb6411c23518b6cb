//! Trace Error definitions.
//!
//! This module defines the error taxonomy of the trace engine. It provides:
//! 1. **Fatal Errors:** Acquisition, I/O, configuration and malformed-trace failures that abort
//!    session construction.
//! 2. **Non-fatal Conditions:** Undefined control codes and correlation misses, which are carried
//!    as values inside decoded data rather than returned as `Err`.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Result type used throughout the trace engine.
pub type Result<T> = std::result::Result<T, TraceError>;

/// Errors that prevent a debugging session from being constructed.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The simulator did not finish emitting its trace within the allowed time.
    #[error("simulator did not complete within {timeout:?}")]
    AcquisitionTimeout {
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// The simulator could not be started or its output could not be read.
    #[error("failed to run simulator `{command}`: {source}")]
    Acquisition {
        /// Program that was invoked.
        command: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The simulator exited unsuccessfully.
    #[error("simulator `{command}` exited with {status}")]
    SimulatorFailed {
        /// Program that was invoked.
        command: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
    },

    /// A trace line could not be parsed as a cycle record.
    #[error("malformed trace at line {line}: {reason}")]
    MalformedTrace {
        /// 1-based line number within the trace text.
        line: usize,
        /// Parser diagnostic.
        reason: String,
    },

    /// The trace contained no cycle records.
    #[error("malformed trace: no cycle records")]
    EmptyTrace,

    /// A trace, listing or configuration file could not be read.
    #[error("could not read `{}`: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The session configuration was not valid JSON for [`crate::config::Config`].
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl TraceError {
    /// Returns `true` if the error stems from trace content rather than from acquisition or I/O.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedTrace { .. } | Self::EmptyTrace)
    }
}

/// Control field whose code fell outside its decode table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlField {
    /// Execute-stage ALU selector (`ex_c4`).
    ExecuteAlu,
    /// Execute-stage memory access selector (`ex_c5`/`ex_c6`).
    ExecuteMemAccess,
    /// Execute-stage write-back source selector (`ex_c7`/`ex_c9`).
    ExecuteWriteBack,
    /// Memory-stage memory access selector (`mem_c5`/`mem_c6`).
    MemoryMemAccess,
    /// Memory-stage write-back source selector (`mem_c7`/`mem_c9`).
    MemoryWriteBack,
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExecuteAlu => "EX_AL",
            Self::ExecuteMemAccess => "EX_RW",
            Self::ExecuteWriteBack => "EX_WB",
            Self::MemoryMemAccess => "MA_RW",
            Self::MemoryWriteBack => "MA_WB",
        };
        f.write_str(name)
    }
}

/// A decode-table lookup fell outside the table's known range.
///
/// The cycle is still decoded with the affected field set to `Undefined`; this record makes
/// the anomaly visible, since it usually means the simulator and the engine disagree on the
/// signal schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("undefined control code {code:#x} in {field}")]
pub struct UndefinedControlCode {
    /// Field that failed to decode.
    pub field: ControlField,
    /// The packed code that was looked up.
    pub code: u32,
}

/// A program counter had no exactly matching line in the disassembly listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("address {0:#010x} not found in listing")]
pub struct AddressNotFound(pub u32);
