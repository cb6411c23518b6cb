//! Trace acquisition and session assembly.
//!
//! Runs the external simulator under a bounded wait and turns its output, or a saved trace,
//! into a ready debugging session.

/// Time-bounded simulator invocation.
pub mod acquire;

/// Session construction.
pub mod session;

pub use acquire::Acquisition;
pub use session::Session;
