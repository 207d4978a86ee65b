//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Print sizes as `1.5M` instead of raw byte counts
    pub human: bool,
}
