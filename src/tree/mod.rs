//! Usage tree and flattening
//!
//! - `UsageNode`: a lazily expanded tree mirroring the directory hierarchy,
//!   where every node knows how many bytes beneath it are still unreported
//! - `Flattener`: repeatedly pulls the node closest to an even share of the
//!   remainder out of the tree, producing a bounded list of chunks

mod config;
mod flatten;
mod node;

pub use config::{DEFAULT_MAX_NODES, FlattenConfig};
pub use flatten::{Flattener, sort_chunks, total_size};
pub use node::{IndexPath, UsageNode};
