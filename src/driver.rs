//! Local driver for every reduce partition of one job.
//!
//! Partitions are independent invocations of
//! [`do_reduce_with_order`](crate::task::do_reduce_with_order): they read
//! disjoint inputs, write disjoint outputs and share no mutable state. The
//! driver can therefore run them one after another or concurrently on a
//! rayon pool (feature `parallel`). Each invocation stays single-threaded.

use crate::error::{ReduceError, Result};
use crate::io::stream::RecordReader;
use crate::naming::result_file_name;
use crate::ordering::KeyOrder;
use crate::record::KeyValue;
use crate::reducers::Reducer;
use crate::task::{ReduceSummary, ReduceTask, do_reduce_with_order};
use std::fs::File;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    #[default]
    Sequential,
    /// Run partitions concurrently; `threads: None` uses rayon's default.
    Parallel { threads: Option<usize> },
}

/// Everything needed to reduce all partitions of a job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSpec {
    pub job_name: String,
    pub source_count: usize,
    pub partitions: usize,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl JobSpec {
    pub fn new(job_name: impl Into<String>, source_count: usize, partitions: usize) -> Self {
        Self {
            job_name: job_name.into(),
            source_count,
            partitions,
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// The reduce task for partition `partition`.
    pub fn task(&self, partition: usize) -> ReduceTask {
        ReduceTask::new(
            self.job_name.clone(),
            partition,
            self.source_count,
            self.result_path(partition),
        )
    }

    pub fn result_path(&self, partition: usize) -> PathBuf {
        self.output_dir
            .join(result_file_name(&self.job_name, partition))
    }
}

/// Per-partition outcomes of [`run_job`], indexed by partition.
#[derive(Debug)]
pub struct JobReport {
    pub results: Vec<Result<ReduceSummary>>,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }

    /// Partitions that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &ReduceError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }

    /// All summaries, or the error of the first failed partition.
    ///
    /// # Errors
    /// Returns the first partition error in partition order.
    pub fn into_result(self) -> Result<Vec<ReduceSummary>> {
        self.results.into_iter().collect()
    }
}

/// Reduce every partition `0..spec.partitions` of a job.
///
/// Results are reported per partition, in partition order, whatever the
/// execution mode. A failed partition does not stop the others.
///
/// # Errors
/// Returns [`ReduceError::InvalidConfig`] if the thread pool for
/// [`ExecMode::Parallel`] cannot be built.
pub fn run_job<O, R>(spec: &JobSpec, order: &O, reducer: &R, mode: ExecMode) -> Result<JobReport>
where
    O: KeyOrder + ?Sized,
    R: Reducer + ?Sized,
{
    info!(
        job = %spec.job_name,
        partitions = spec.partitions,
        sources = spec.source_count,
        ?mode,
        "running reduce job"
    );
    let run_one = |partition: usize| {
        let r = do_reduce_with_order(&spec.task(partition), &spec.input_dir, order, reducer);
        if let Err(e) = &r {
            warn!(partition, error = %e, "partition failed");
        }
        r
    };

    let results = match mode {
        ExecMode::Sequential => (0..spec.partitions).map(run_one).collect(),
        ExecMode::Parallel { threads } => run_parallel(spec.partitions, threads, run_one)?,
    };
    Ok(JobReport { results })
}

#[cfg(feature = "parallel")]
fn run_parallel<F>(partitions: usize, threads: Option<usize>, run_one: F) -> Result<Vec<Result<ReduceSummary>>>
where
    F: Fn(usize) -> Result<ReduceSummary> + Send + Sync,
{
    use rayon::prelude::*;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(t) = threads {
        builder = builder.num_threads(t);
    }
    let pool = builder
        .build()
        .map_err(|e| ReduceError::InvalidConfig(format!("thread pool: {e}")))?;
    // Indexed parallel iterators collect in index order.
    Ok(pool.install(|| (0..partitions).into_par_iter().map(run_one).collect()))
}

#[cfg(not(feature = "parallel"))]
fn run_parallel<F>(partitions: usize, _threads: Option<usize>, run_one: F) -> Result<Vec<Result<ReduceSummary>>>
where
    F: Fn(usize) -> Result<ReduceSummary> + Send + Sync,
{
    warn!("built without the `parallel` feature; running partitions sequentially");
    Ok((0..partitions).map(run_one).collect())
}

/// Read the result file of one partition back.
///
/// Result files use the same record format as intermediate files, so this
/// goes through the same best-effort [`RecordReader`].
///
/// # Errors
/// Returns [`ReduceError::MissingResult`] if the result file cannot be opened.
pub fn read_partition_results(spec: &JobSpec, partition: usize) -> Result<Vec<KeyValue>> {
    let path = spec.result_path(partition);
    let f = File::open(&path).map_err(|source| ReduceError::MissingResult {
        path: path.clone(),
        partition,
        source,
    })?;
    Ok(RecordReader::new(f).collect())
}
