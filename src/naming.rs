//! File naming conventions for intermediate and result files.
//!
//! Map task `m` writes the records destined for reduce partition `r` of job
//! `job` to [`intermediate_file_name`]`(job, m, r)`. Reduce partition `r`
//! writes its output to [`result_file_name`]`(job, r)`.
//!
//! Both functions are pure and do not validate their indices; callers supply
//! values consistent with the job's source and partition counts.

use std::path::{Path, PathBuf};

/// Name of the intermediate file produced by source `source` for partition `partition`.
///
/// ```
/// use ironreduce::naming::intermediate_file_name;
///
/// assert_eq!(intermediate_file_name("wc", 3, 1), "mrtmp.wc-3-1");
/// ```
#[must_use]
pub fn intermediate_file_name(job_name: &str, source: usize, partition: usize) -> String {
    format!("mrtmp.{job_name}-{source}-{partition}")
}

/// Name of the result file written by reduce partition `partition`.
///
/// ```
/// use ironreduce::naming::result_file_name;
///
/// assert_eq!(result_file_name("wc", 1), "mrtmp.wc-res-1");
/// ```
#[must_use]
pub fn result_file_name(job_name: &str, partition: usize) -> String {
    format!("mrtmp.{job_name}-res-{partition}")
}

/// Identifies the intermediate files that feed one reduce partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionDescriptor {
    /// Job identifier used as the file name stem.
    pub job_name: String,
    /// Number of upstream sources; exactly this many files are expected.
    pub source_count: usize,
    /// Reduce partition index.
    pub partition: usize,
}

impl PartitionDescriptor {
    #[must_use]
    pub fn new(job_name: impl Into<String>, source_count: usize, partition: usize) -> Self {
        Self {
            job_name: job_name.into(),
            source_count,
            partition,
        }
    }

    /// Paths of every source file for this partition under `dir`, in source order.
    pub fn source_paths(&self, dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        (0..self.source_count)
            .map(|m| dir.join(intermediate_file_name(&self.job_name, m, self.partition)))
            .collect()
    }

    /// Conventional result path for this partition under `dir`.
    pub fn result_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref()
            .join(result_file_name(&self.job_name, self.partition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_convention() {
        assert_eq!(intermediate_file_name("job", 0, 0), "mrtmp.job-0-0");
        assert_eq!(intermediate_file_name("a-b", 12, 7), "mrtmp.a-b-12-7");
        assert_eq!(result_file_name("job", 4), "mrtmp.job-res-4");
    }

    #[test]
    fn descriptor_lists_sources_in_order() {
        let d = PartitionDescriptor::new("test", 3, 2);
        let paths = d.source_paths("/tmp/x");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/tmp/x/mrtmp.test-0-2"),
                PathBuf::from("/tmp/x/mrtmp.test-1-2"),
                PathBuf::from("/tmp/x/mrtmp.test-2-2"),
            ]
        );
        assert_eq!(d.result_path("out"), PathBuf::from("out/mrtmp.test-res-2"));
    }

    #[test]
    fn zero_sources_means_no_paths() {
        let d = PartitionDescriptor::new("empty", 0, 0);
        assert!(d.source_paths(".").is_empty());
    }
}
