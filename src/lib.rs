//! duflat - A flat summary of disk usage in a fixed number of lines

pub mod error;
pub mod lister;
pub mod oracle;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Result, ScanError};
pub use lister::{EntryLister, FsLister, IgnoreSet};
pub use oracle::{DuOracle, SizeOracle};
pub use output::{ChunkFormatter, LineProtocolSink, OutputConfig, export_chunks, print_json};
pub use tree::{FlattenConfig, Flattener, UsageNode};
