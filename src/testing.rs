//! Testing utilities for reduce jobs.
//!
//! This module helps writing tests around reduce invocations:
//!
//! - **Fixtures**: [`JobDir`] lays out intermediate files in a temporary
//!   directory using the job's naming convention.
//! - **Assertions**: compare result sequences where the order of values
//!   inside a reduced value is not guaranteed.
//!
//! # Quick Start
//!
//! ```no_run
//! use ironreduce::testing::*;
//! use ironreduce::reducers::Join;
//! use ironreduce::{ReduceConfig, do_reduce};
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = JobDir::new("test")?;
//! dir.write_source(0, 0, &[kv("1", "a"), kv("2", "x")])?;
//! dir.write_source(1, 0, &[kv("1", "b")])?;
//!
//! let task = dir.task(0, 2);
//! do_reduce(&task, &dir.config(), &Join::default())?;
//!
//! let results = dir.read_output(&task)?;
//! assert_joined_values(&results, "1", ",", &["a", "b"]);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
