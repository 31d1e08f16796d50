//! Record stream I/O shared by the merger and the result writer.
//!
//! Intermediate files and result files use the same format, so a result file
//! can be read back with [`stream::RecordReader`] exactly like an
//! intermediate one.

pub mod stream;

pub use stream::{RecordReader, RecordWriter, StreamEnd, WriteReport, write_results};
