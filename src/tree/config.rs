//! Configuration types for flattening

/// Default number of output lines.
pub const DEFAULT_MAX_NODES: usize = 10;

/// Configuration for the flattening run.
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Upper bound on the number of chunks returned. Values below 1 behave
    /// like 1.
    pub max_nodes: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}
