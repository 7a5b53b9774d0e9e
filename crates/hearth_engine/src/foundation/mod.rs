//! Shared building blocks
//!
//! nalgebra aliases and transform helpers, typed handles over `slotmap`,
//! the frame timer and the logging bootstrap used by binaries.

pub mod collections;
pub mod logging;
pub mod math;
pub mod time;
