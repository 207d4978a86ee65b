//! JSON output formatting

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::tree::{UsageNode, total_size};

use super::utils::percent_of;

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub root: PathBuf,
    pub total_bytes: u64,
    pub chunks: Vec<JsonChunk>,
}

#[derive(Debug, Serialize)]
pub struct JsonChunk {
    pub path: PathBuf,
    pub bytes: u64,
    pub percent: f64,
}

impl JsonReport {
    pub fn new(root: &Path, chunks: &[UsageNode]) -> Self {
        let total_bytes = total_size(chunks);
        Self {
            root: root.to_path_buf(),
            total_bytes,
            chunks: chunks
                .iter()
                .map(|c| JsonChunk {
                    path: c.path.clone(),
                    bytes: c.size,
                    percent: percent_of(c.size, total_bytes),
                })
                .collect(),
        }
    }
}

/// Print chunks as pretty-printed JSON to stdout.
pub fn print_json(root: &Path, chunks: &[UsageNode]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::new(root, chunks)).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
