#![warn(missing_docs)]
//! scanbench Core - Timing Harness
//!
//! This crate provides the measurement side of scanbench:
//! - [`Stopwatch`] accumulating laps of an operation, recorded on every exit path
//! - [`BenchmarkRunner`] running equivalent strategies side by side and
//!   failing fast when their results disagree
//! - High-precision timing (cycle counter alongside `Instant`)

mod error;
mod measure;
mod runner;
mod stopwatch;

pub use error::{BenchError, BoxError};
pub use measure::{HAS_CYCLE_COUNTER, Timer};
pub use runner::{BenchmarkRunner, Measurements};
pub use stopwatch::{LapGuard, Stopwatch, format_centis};
