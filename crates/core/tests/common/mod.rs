//! Shared test infrastructure for trace engine tests.
//!
//! - **Builders**: Fluent construction of raw cycle records and the JSON lines the simulator emits.

pub mod builder;
