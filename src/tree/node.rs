//! UsageNode - a lazily expanded, size-weighted view of the filesystem

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::lister::EntryLister;
use crate::oracle::SizeOracle;

/// A file or subtree with the number of bytes not yet reported beneath it.
///
/// `children` is `None` until the node is expanded, which is distinct from
/// `Some(vec![])` for a node known to have no children. Children are kept
/// sorted by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageNode {
    pub path: PathBuf,
    pub size: u64,
    pub children: Option<Vec<UsageNode>>,
}

/// Index path to a descendant, outermost index last.
pub type IndexPath = Vec<usize>;

impl UsageNode {
    /// Create an unexpanded node.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            children: None,
        }
    }

    /// Create an unexpanded node sized by the oracle.
    pub fn measure(path: &Path, oracle: &impl SizeOracle) -> Result<Self> {
        Ok(Self::new(path, oracle.size_of(path)?))
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    /// Child nodes, empty when not yet expanded.
    pub fn children(&self) -> &[UsageNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Expand every node of at least `threshold` bytes.
    ///
    /// Unexpanded nodes are listed once; already expanded subtrees are walked
    /// again so that a smaller threshold reaches deeper.
    pub fn expand(
        &mut self,
        threshold: u64,
        oracle: &impl SizeOracle,
        lister: &impl EntryLister,
    ) -> Result<()> {
        if self.size < threshold {
            return Ok(());
        }

        if self.children.is_none() {
            let mut paths = lister.list(&self.path)?;
            paths.sort();
            let children = paths
                .iter()
                .map(|p| UsageNode::measure(p, oracle))
                .collect::<Result<Vec<_>>>()?;
            self.children = Some(children);
        }

        if let Some(children) = self.children.as_mut() {
            for child in children {
                child.expand(threshold, oracle, lister)?;
            }
        }
        Ok(())
    }

    /// Find the node in this subtree whose size is closest to `target`.
    ///
    /// Returns the absolute difference and the index path to the winner. A
    /// child beats the current best when strictly closer, or when equally
    /// close while the best is still this node itself; later ties never
    /// displace an earlier child.
    pub fn find_closest(&self, target: u64) -> (u64, IndexPath) {
        let mut best = (target.abs_diff(self.size), IndexPath::new());

        for (i, child) in self.children().iter().enumerate() {
            let (diff, mut path) = child.find_closest(target);
            if diff < best.0 || (diff == best.0 && best.1.is_empty()) {
                path.push(i);
                best = (diff, path);
            }
        }
        best
    }

    /// Remove the descendant at `index_path`, deducting its size from every
    /// node on the way down.
    ///
    /// Returns `None` when the path is empty, meaning this node itself is the
    /// selection and nothing was detached.
    pub fn detach(&mut self, index_path: &mut IndexPath) -> Option<UsageNode> {
        let i = index_path.pop()?;
        let children = self.children.as_mut()?;
        let detached = if index_path.is_empty() {
            if i >= children.len() {
                return None;
            }
            children.remove(i)
        } else {
            children.get_mut(i)?.detach(index_path)?
        };

        self.size = match self.size.checked_sub(detached.size) {
            Some(rest) => rest,
            None => {
                warn!(
                    path = %self.path.display(),
                    parent = self.size,
                    child = detached.size,
                    "child larger than parent, clamping to zero"
                );
                0
            }
        };
        Some(detached)
    }

    /// Detach the node closest to `target`, or `None` if that is this node.
    pub fn extract_closest(&mut self, target: u64) -> Option<UsageNode> {
        let (_, mut index_path) = self.find_closest(target);
        self.detach(&mut index_path)
    }
}
