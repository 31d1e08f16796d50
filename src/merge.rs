//! Multi-source merge for one reduce partition.
//!
//! [`merge_sources`] opens every intermediate file named by a
//! [`PartitionDescriptor`], decodes each one as a record stream and
//! concatenates the records in source order. No ordering is imposed here.
//!
//! All files are opened before any is read, so a missing source fails the
//! call before any decoding work is done. Handles are owned by this call and
//! closed on return, whether it succeeds or fails.

use crate::error::{ReduceError, Result};
use crate::io::stream::{RecordReader, StreamEnd};
use crate::naming::PartitionDescriptor;
use crate::record::KeyValue;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What was read from one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStats {
    pub path: PathBuf,
    pub records: usize,
    /// The stream ended on a decode failure rather than a clean end of file.
    pub truncated: bool,
}

/// All records of one partition, in source order, plus per-source stats.
#[derive(Debug, Default)]
pub struct MergedPartition {
    pub records: Vec<KeyValue>,
    pub sources: Vec<SourceStats>,
}

impl MergedPartition {
    /// Number of sources whose stream ended on a decode failure.
    pub fn truncated_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.truncated).count()
    }
}

/// Read and concatenate every source file of `desc` found under `input_dir`.
///
/// Decoding is best-effort: a source whose stream ends with a malformed or
/// truncated record contributes its well-formed prefix and is logged at
/// `warn`; it is not an error.
///
/// # Errors
/// Returns [`ReduceError::MissingSource`] for the first source file that
/// cannot be opened. No records are returned in that case.
pub fn merge_sources(desc: &PartitionDescriptor, input_dir: impl AsRef<Path>) -> Result<MergedPartition> {
    let paths = desc.source_paths(input_dir);

    let mut files = Vec::with_capacity(paths.len());
    for (source_index, path) in paths.into_iter().enumerate() {
        let f = File::open(&path).map_err(|source| ReduceError::MissingSource {
            path: path.clone(),
            source_index,
            source,
        })?;
        files.push((path, f));
    }

    let mut merged = MergedPartition {
        records: Vec::new(),
        sources: Vec::with_capacity(files.len()),
    };
    for (path, f) in files {
        let mut reader = RecordReader::new(f);
        merged.records.extend(reader.by_ref());

        let truncated = match reader.end() {
            StreamEnd::Truncated(reason) => {
                warn!(
                    path = %path.display(),
                    records = reader.records(),
                    %reason,
                    "source ended on a decode error; keeping the well-formed prefix"
                );
                true
            }
            _ => false,
        };
        debug!(path = %path.display(), records = reader.records(), "read source");
        merged.sources.push(SourceStats {
            path,
            records: reader.records(),
            truncated,
        });
    }
    Ok(merged)
}
