//! Self-delimiting JSON record streams.
//!
//! A stream is a sequence of JSON objects written back to back, with no
//! record count or length prefix. The writer emits one object per line; the
//! reader accepts any whitespace between objects.
//!
//! # Notes
//! - Reading is **best-effort**: the first decode failure ends the stream.
//!   A truncated or malformed trailing fragment is therefore indistinguishable
//!   from a clean end for the caller, except through [`StreamEnd`].
//! - A `null` document or an object missing `Key`/`Value` decodes as a record
//!   with empty fields, as Go's `encoding/json` does.
//! - Writing is per record: a record that fails to serialize or write is
//!   reported and the following records are still attempted. The sink is
//!   rewound over a torn record, so the output only ever holds whole ones.

use crate::error::{RecordWriteFailure, ReduceError, Result};
use crate::record::KeyValue;
use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer};
use std::fs::{File, create_dir_all};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How a record stream ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEnd {
    /// Still reading.
    Open,
    /// End of input reached on a record boundary.
    Clean,
    /// Decoding failed; everything before the failure was yielded.
    Truncated(String),
}

/// Iterator over the records of one stream.
///
/// Yields records until the underlying stream is exhausted or the first
/// decode error, whichever comes first. Never yields an error.
pub struct RecordReader<R: Read> {
    inner: StreamDeserializer<'static, IoRead<BufReader<R>>, Option<KeyValue>>,
    records: usize,
    end: StreamEnd,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: Deserializer::from_reader(BufReader::new(reader)).into_iter::<Option<KeyValue>>(),
            records: 0,
            end: StreamEnd::Open,
        }
    }

    /// Number of records yielded so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// How the stream ended, or [`StreamEnd::Open`] if it has not ended yet.
    pub fn end(&self) -> &StreamEnd {
        &self.end
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = KeyValue;

    fn next(&mut self) -> Option<KeyValue> {
        if self.end != StreamEnd::Open {
            return None;
        }
        match self.inner.next() {
            Some(Ok(kv)) => {
                self.records += 1;
                Some(kv.unwrap_or_default())
            }
            Some(Err(e)) => {
                self.end = StreamEnd::Truncated(e.to_string());
                None
            }
            None => {
                self.end = StreamEnd::Clean;
                None
            }
        }
    }
}

/// Writes records as newline-terminated JSON objects.
pub struct RecordWriter<W: Write> {
    inner: W,
    line: Vec<u8>,
    committed: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            line: Vec::with_capacity(128),
            committed: 0,
        }
    }

    /// Serialize and write one record.
    ///
    /// The record is serialized into a scratch buffer first, so a
    /// serialization failure never leaves a partial object in the sink.
    ///
    /// A failed write may still have put part of the object into the sink;
    /// see [`write_all_records`](Self::write_all_records) for recovery.
    ///
    /// # Errors
    /// Returns an error if serialization or the underlying write fails.
    pub fn write_record(&mut self, kv: &KeyValue) -> io::Result<()> {
        self.line.clear();
        serde_json::to_writer(&mut self.line, kv)?;
        self.line.push(b'\n');
        self.inner.write_all(&self.line)?;
        self.committed += self.line.len() as u64;
        Ok(())
    }

    /// Bytes of complete records written so far.
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// # Errors
    /// Returns an error if the underlying sink fails to flush.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Seek> RecordWriter<W> {
    /// Write every record, continuing past failures.
    ///
    /// After a failed write the sink is moved back to the end of the last
    /// complete record, so the next record overwrites any torn fragment. A
    /// fragment left by the final record lies past [`committed`](Self::committed)
    /// and is the caller's to cut.
    ///
    /// Returns the number of records written and the failures, in order.
    pub fn write_all_records(&mut self, records: &[KeyValue]) -> (usize, Vec<RecordWriteFailure>) {
        let mut written = 0;
        let mut failures = Vec::new();
        for (index, kv) in records.iter().enumerate() {
            match self.write_record(kv) {
                Ok(()) => written += 1,
                Err(error) => {
                    warn!(index, key = %kv.key, %error, "failed to write result record");
                    if let Err(e) = self.inner.seek(SeekFrom::Start(self.committed)) {
                        warn!(index, error = %e, "cannot rewind output past a torn record");
                    }
                    failures.push(RecordWriteFailure {
                        index,
                        key: kv.key.clone(),
                        error,
                    });
                }
            }
        }
        (written, failures)
    }
}

/// Outcome of a complete [`write_results`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub written: usize,
}

/// Create (or truncate) `path` and write `results` to it in order.
///
/// Parent directories are created as needed. The file is written unbuffered
/// so each failed write is attributed to its record. Records that failed are
/// absent from the file; every record counted as written reads back.
///
/// # Errors
/// - [`ReduceError::CreateOutput`] if the file or its parent directory cannot be created.
/// - [`ReduceError::IncompleteOutput`] if any record failed to write. Every
///   record is still attempted before this is returned.
pub fn write_results(path: impl AsRef<Path>, results: &[KeyValue]) -> Result<WriteReport> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).map_err(|source| ReduceError::CreateOutput {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let f = File::create(path).map_err(|source| ReduceError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;

    let mut w = RecordWriter::new(f);
    let (written, failures) = w.write_all_records(results);
    if !failures.is_empty() {
        let committed = w.committed();
        if let Err(error) = w.into_inner().set_len(committed) {
            warn!(path = %path.display(), %error, "cannot cut torn tail from output");
        }
    }
    debug!(path = %path.display(), written, failed = failures.len(), "wrote results");

    if failures.is_empty() {
        Ok(WriteReport {
            path: path.to_path_buf(),
            written,
        })
    } else {
        Err(ReduceError::IncompleteOutput {
            path: path.to_path_buf(),
            written,
            failures,
        })
    }
}
