//! Temporary job directories and record helpers.

use crate::config::ReduceConfig;
use crate::io::stream::{RecordReader, RecordWriter};
use crate::naming::{intermediate_file_name, result_file_name};
use crate::record::KeyValue;
use crate::task::ReduceTask;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Shorthand for [`KeyValue::new`].
pub fn kv(key: &str, value: &str) -> KeyValue {
    KeyValue::new(key, value)
}

/// A temporary directory holding the intermediate and result files of one job.
///
/// The directory and everything in it is removed on drop.
pub struct JobDir {
    dir: TempDir,
    job_name: String,
}

impl JobDir {
    /// # Errors
    /// Returns an error if the temporary directory cannot be created.
    pub fn new(job_name: &str) -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("create temp job dir")?,
            job_name: job_name.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Path of the intermediate file of `source` for `partition`.
    pub fn source_path(&self, source: usize, partition: usize) -> PathBuf {
        self.path()
            .join(intermediate_file_name(&self.job_name, source, partition))
    }

    /// Write well-formed records as the intermediate file of `source` for `partition`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_source(&self, source: usize, partition: usize, records: &[KeyValue]) -> Result<PathBuf> {
        let path = self.source_path(source, partition);
        let f = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut w = RecordWriter::new(f);
        for r in records {
            w.write_record(r)
                .with_context(|| format!("write record to {}", path.display()))?;
        }
        w.flush()?;
        Ok(path)
    }

    /// Write arbitrary bytes as the intermediate file of `source` for `partition`.
    ///
    /// Useful for truncated or malformed sources.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_raw_source(&self, source: usize, partition: usize, contents: &str) -> Result<PathBuf> {
        let path = self.source_path(source, partition);
        let mut f = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        f.write_all(contents.as_bytes())?;
        Ok(path)
    }

    /// A task for `partition` writing to an `out/` subdirectory of this job dir.
    pub fn task(&self, partition: usize, source_count: usize) -> ReduceTask {
        ReduceTask::new(
            self.job_name.clone(),
            partition,
            source_count,
            self.path()
                .join("out")
                .join(result_file_name(&self.job_name, partition)),
        )
    }

    /// Configuration reading intermediate files from this directory.
    pub fn config(&self) -> ReduceConfig {
        ReduceConfig::default().with_input_dir(self.path())
    }

    /// Records in the output file of `task`.
    ///
    /// # Errors
    /// Returns an error if the output file cannot be opened.
    pub fn read_output(&self, task: &ReduceTask) -> Result<Vec<KeyValue>> {
        let f = File::open(&task.output)
            .with_context(|| format!("open {}", task.output.display()))?;
        Ok(RecordReader::new(f).collect())
    }

    /// Raw bytes of the output file of `task`.
    ///
    /// # Errors
    /// Returns an error if the output file cannot be read.
    pub fn read_output_bytes(&self, task: &ReduceTask) -> Result<Vec<u8>> {
        fs::read(&task.output).with_context(|| format!("read {}", task.output.display()))
    }
}

/// Three sources for partition 0 with keys `"1"` and `"2"` spread across them.
///
/// Source 0: `1=a`, `2=x`; source 1: `1=b`; source 2: `2=y`, `1=c`.
#[must_use]
pub fn split_sources() -> Vec<Vec<KeyValue>> {
    vec![
        vec![kv("1", "a"), kv("2", "x")],
        vec![kv("1", "b")],
        vec![kv("2", "y"), kv("1", "c")],
    ]
}

/// Word-count style intermediate records, one inner vector per source.
///
/// Every source emits the value `"1"` twice for each key in `0..keys`.
#[must_use]
pub fn numeric_word_counts(n_sources: usize, keys: usize) -> Vec<Vec<KeyValue>> {
    (0..n_sources)
        .map(|s| {
            (0..keys * 2)
                .map(|i| kv(&((i + s) % keys).to_string(), "1"))
                .collect()
        })
        .collect()
}
