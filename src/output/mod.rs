//! Reporting flattened chunks
//!
//! - `config` - Output configuration types
//! - `console` - Aligned, optionally colored lines on stdout
//! - `json` - JSON report
//! - `metrics` - Line protocol export to a metrics sink
//! - `utils` - Size formatting helpers

mod config;
mod console;
mod json;
mod metrics;
mod utils;

pub use config::OutputConfig;
pub use console::ChunkFormatter;
pub use json::{JsonChunk, JsonReport, print_json};
pub use metrics::{DataPoint, LineProtocolSink, MEASUREMENT, MetricsSink, export_chunks};
pub use utils::{format_size, percent_of};
