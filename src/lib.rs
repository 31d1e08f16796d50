//! # ironreduce
//!
//! The **reduce side** of a batch key/value job: merge the intermediate files
//! that upstream map workers produced for one partition, sort the records by
//! key, call an aggregation function once per key, and write the ordered
//! results to a single output file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ironreduce::*;
//! use ironreduce::reducers::Join;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! // Reads mrtmp.wc-0-0, mrtmp.wc-1-0, mrtmp.wc-2-0 from the current directory.
//! let task = ReduceTask::new("wc", 0, 3, result_file_name("wc", 0));
//! let summary = do_reduce(&task, &ReduceConfig::default(), &Join::new(" "))?;
//! println!("{} records -> {} keys", summary.input_records, summary.output_records);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! One invocation runs these stages in order, on the calling thread:
//!
//! 1. **Merge** ([`merge`]) -- open all `source_count` files named by
//!    [`naming::intermediate_file_name`] and decode each as a record stream.
//!    A missing file fails the invocation with
//!    [`ReduceError::MissingSource`]. A truncated or malformed tail ends that
//!    file's stream and is otherwise ignored.
//! 2. **Sort** ([`ordering`]) -- sort by an explicit [`KeyOrder`] policy. The
//!    default, [`NumericKeyOrder`], compares keys as integers with unparseable
//!    keys treated as `0`.
//! 3. **Group/reduce** ([`group`]) -- one [`Reducer`] call per run of adjacent,
//!    string-equal keys.
//! 4. **Write** ([`io`]) -- one JSON object per result, in order, in the same
//!    format the merger reads. Records that fail to write are collected into
//!    [`ReduceError::IncompleteOutput`].
//!
//! Re-running an invocation on unchanged inputs produces a byte-identical
//! output file.
//!
//! ## Record format
//!
//! ```text
//! {"Key":"1","Value":"a"}
//! {"Key":"2","Value":"x"}
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - run the partitions of a job concurrently in
//!   [`driver::run_job`] with rayon.
//!
//! ## Module Overview
//!
//! - [`naming`] - intermediate/result file names
//! - [`record`] - `KeyValue` and `Group`
//! - [`io`] - record stream reader/writer
//! - [`merge`] - multi-source merge
//! - [`ordering`] - key order policies and [`SortedRecords`]
//! - [`group`] - adjacency grouping and the reduce pass
//! - [`reducers`] - the [`Reducer`] trait and built-in reducers
//! - [`task`] - [`do_reduce`] for one partition
//! - [`driver`] - all partitions of a job
//! - [`config`], [`error`], [`logging`] - ambient plumbing
//! - [`testing`] - fixtures and assertions for tests

pub mod config;
pub mod driver;
pub mod error;
pub mod group;
pub mod io;
pub mod logging;
pub mod merge;
pub mod naming;
pub mod ordering;
pub mod record;
pub mod reducers;
pub mod task;
pub mod testing;

// General re-exports
pub use config::ReduceConfig;
pub use driver::{ExecMode, JobReport, JobSpec, read_partition_results, run_job};
pub use error::{ReduceError, Result};
pub use group::{Groups, group_reduce};
pub use merge::{MergedPartition, SourceStats, merge_sources};
pub use naming::{PartitionDescriptor, intermediate_file_name, result_file_name};
pub use ordering::{
    KeyOrder, KeyOrderKind, LexicographicKeyOrder, NumericKeyOrder, NumericThenLexicographic,
    SortedRecords,
};
pub use record::{Group, KeyValue};
pub use reducers::Reducer;
pub use task::{ReduceSummary, ReduceTask, do_reduce, do_reduce_with_order};
