//! Metrics export in line protocol
//!
//! Every chunk becomes one data point tagged with its absolute path and the
//! uid owning it, carrying its size in a single `bytes` field.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::tree::UsageNode;

/// Measurement name used for exported points.
pub const MEASUREMENT: &str = "disk_usage";

/// Owner tag used when a path can no longer be inspected.
pub const UNKNOWN_OWNER: &str = "unknown";

/// A single timestamped measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub measurement: String,
    pub path: PathBuf,
    pub owner: String,
    pub bytes: u64,
    pub timestamp: DateTime<Utc>,
}

impl DataPoint {
    /// Build a point for a chunk, resolving its path and owner.
    pub fn for_chunk(chunk: &UsageNode, timestamp: DateTime<Utc>) -> Self {
        Self {
            measurement: MEASUREMENT.to_string(),
            path: resolve_path(&chunk.path),
            owner: owner_of(&chunk.path),
            bytes: chunk.size,
            timestamp,
        }
    }

    /// Render as a line protocol record, without trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{},path={},owner={} bytes={}i {}",
            escape_measurement(&self.measurement),
            escape_tag(&self.path.to_string_lossy()),
            escape_tag(&self.owner),
            self.bytes,
            self.timestamp.timestamp_nanos_opt().unwrap_or_default()
        )
    }
}

/// Destination for exported data points.
pub trait MetricsSink {
    fn submit(&mut self, point: &DataPoint) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink writing one line protocol record per point.
pub struct LineProtocolSink<W: Write> {
    out: W,
}

impl<W: Write> LineProtocolSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MetricsSink for LineProtocolSink<W> {
    fn submit(&mut self, point: &DataPoint) -> io::Result<()> {
        writeln!(self.out, "{}", point.to_line())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Submit every chunk to `sink` with a shared timestamp.
pub fn export_chunks(
    sink: &mut impl MetricsSink,
    chunks: &[UsageNode],
    timestamp: DateTime<Utc>,
) -> io::Result<()> {
    for chunk in chunks {
        let point = DataPoint::for_chunk(chunk, timestamp);
        debug!(path = %point.path.display(), bytes = point.bytes, "exporting");
        sink.submit(&point)?;
    }
    sink.flush()
}

fn resolve_path(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(unix)]
fn owner_of(path: &Path) -> String {
    use std::os::unix::fs::MetadataExt;

    path.symlink_metadata()
        .map(|m| m.uid().to_string())
        .unwrap_or_else(|_| UNKNOWN_OWNER.to_string())
}

#[cfg(not(unix))]
fn owner_of(_path: &Path) -> String {
    UNKNOWN_OWNER.to_string()
}

fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

fn escape_tag(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}
