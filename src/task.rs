//! The reduce task: merge, sort, group/reduce and write for one partition.
//!
//! ```no_run
//! use ironreduce::{ReduceConfig, ReduceTask, do_reduce};
//! use ironreduce::reducers::Join;
//!
//! # fn main() -> anyhow::Result<()> {
//! let task = ReduceTask::new("wc", 0, 3, "mrtmp.wc-res-0");
//! let summary = do_reduce(&task, &ReduceConfig::default(), &Join::new(" "))?;
//! println!("{} keys", summary.output_records);
//! # Ok(())
//! # }
//! ```

use crate::config::ReduceConfig;
use crate::error::Result;
use crate::group::group_reduce;
use crate::io::stream::write_results;
use crate::merge::{SourceStats, merge_sources};
use crate::naming::PartitionDescriptor;
use crate::ordering::{KeyOrder, SortedRecords};
use crate::reducers::Reducer;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

/// One reduce invocation as handed over by an orchestrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReduceTask {
    pub job_name: String,
    pub partition: usize,
    pub source_count: usize,
    /// Output artifact; created or overwritten.
    pub output: PathBuf,
}

impl ReduceTask {
    pub fn new(
        job_name: impl Into<String>,
        partition: usize,
        source_count: usize,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            partition,
            source_count,
            output: output.into(),
        }
    }

    pub fn descriptor(&self) -> PartitionDescriptor {
        PartitionDescriptor::new(self.job_name.clone(), self.source_count, self.partition)
    }
}

/// What a successful invocation did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReduceSummary {
    pub partition: usize,
    pub output: PathBuf,
    pub sources: Vec<SourceStats>,
    pub input_records: usize,
    pub output_records: usize,
}

/// Run one reduce task with the key order selected by `config`.
///
/// # Errors
/// See [`do_reduce_with_order`].
pub fn do_reduce<R>(task: &ReduceTask, config: &ReduceConfig, reducer: &R) -> Result<ReduceSummary>
where
    R: Reducer + ?Sized,
{
    do_reduce_with_order(task, &config.input_dir, config.key_order.policy(), reducer)
}

/// Run one reduce task with an explicit key order.
///
/// Steps, all on the calling thread:
/// 1. merge every source file of the partition,
/// 2. sort the records by `order`,
/// 3. call `reducer` once per adjacent equal-key run,
/// 4. write the results to `task.output`.
///
/// Re-running with unchanged inputs produces a byte-identical output file.
///
/// # Errors
/// - [`ReduceError::MissingSource`](crate::ReduceError::MissingSource) if a
///   source file cannot be opened; the output file is not touched.
/// - [`ReduceError::CreateOutput`](crate::ReduceError::CreateOutput) if the
///   output cannot be created.
/// - [`ReduceError::IncompleteOutput`](crate::ReduceError::IncompleteOutput)
///   if some result records could not be written.
pub fn do_reduce_with_order<O, R>(
    task: &ReduceTask,
    input_dir: impl AsRef<Path>,
    order: &O,
    reducer: &R,
) -> Result<ReduceSummary>
where
    O: KeyOrder + ?Sized,
    R: Reducer + ?Sized,
{
    let span = info_span!("reduce", job = %task.job_name, partition = task.partition);
    let _enter = span.enter();

    let merged = merge_sources(&task.descriptor(), input_dir)?;
    let input_records = merged.records.len();
    debug!(
        sources = merged.sources.len(),
        records = input_records,
        truncated = merged.truncated_sources(),
        "merged sources"
    );

    let sorted = SortedRecords::sort(merged.records, order);
    debug!(order = order.name(), "sorted records");

    let results = group_reduce(&sorted, reducer);
    drop(sorted);

    let report = write_results(&task.output, &results)?;
    info!(
        output = %report.path.display(),
        input_records,
        keys = report.written,
        "reduce finished"
    );

    Ok(ReduceSummary {
        partition: task.partition,
        output: report.path,
        sources: merged.sources,
        input_records,
        output_records: report.written,
    })
}
