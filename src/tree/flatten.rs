//! Flattener - turns a directory into a bounded list of evenly sized chunks

use std::cmp::Reverse;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::lister::EntryLister;
use crate::oracle::SizeOracle;

use super::config::FlattenConfig;
use super::node::UsageNode;

/// Drives expansion and extraction over a [`UsageNode`] tree.
///
/// Each round targets an even share of whatever is still unreported, pulls
/// out the node closest to that share, and stops early once the root itself
/// is the best match.
pub struct Flattener<O, L> {
    config: FlattenConfig,
    oracle: O,
    lister: L,
}

impl<O: SizeOracle, L: EntryLister> Flattener<O, L> {
    pub fn new(config: FlattenConfig, oracle: O, lister: L) -> Self {
        Self {
            config,
            oracle,
            lister,
        }
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Flatten the tree under `root` into at most `max_nodes` chunks.
    ///
    /// The first entry before sorting is the root carrying its residual size,
    /// so the chunk sizes always add up to the root's measured size. Output is
    /// sorted by path, then by size descending.
    pub fn flatten(&self, root: &Path) -> Result<Vec<UsageNode>> {
        let mut root_node = UsageNode::measure(root, &self.oracle)?;
        info!(root = %root.display(), bytes = root_node.size, "measured scan root");

        let mut chunks = Vec::new();
        for remaining in (2..=self.config.max_nodes).rev() {
            let target = root_node.size / remaining as u64 + 1;
            root_node.expand(target, &self.oracle, &self.lister)?;

            match root_node.extract_closest(target) {
                Some(chunk) => {
                    debug!(path = %chunk.path.display(), bytes = chunk.size, target, "extracted");
                    chunks.push(chunk);
                }
                None => {
                    debug!(target, "root is the closest match, stopping");
                    break;
                }
            }
        }

        chunks.insert(0, root_node);
        sort_chunks(&mut chunks);
        Ok(chunks)
    }
}

/// Sort by path ascending, then size descending. Stable.
pub fn sort_chunks(chunks: &mut [UsageNode]) {
    chunks.sort_by(|a, b| (&a.path, Reverse(a.size)).cmp(&(&b.path, Reverse(b.size))));
}

/// Total bytes across chunks.
pub fn total_size(chunks: &[UsageNode]) -> u64 {
    chunks.iter().map(|c| c.size).sum()
}
