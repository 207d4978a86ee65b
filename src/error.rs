//! Error types for scanning

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a scan.
///
/// Every size feeding the flattening must be genuine, so none of these are
/// ever turned into a zero size.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The disk-usage command could not be run or exited abnormally.
    #[error("cannot measure '{}': {reason}", path.display())]
    OracleInvocation { path: PathBuf, reason: String },

    /// The disk-usage command ran but printed no usable byte count.
    #[error("cannot parse size of '{}' from {output:?}", path.display())]
    OracleParse { path: PathBuf, output: String },

    /// Permission denied, or the path vanished during traversal.
    #[error("cannot access '{}': {source}", path.display())]
    PathAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub(crate) fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::PathAccess {
            path: path.into(),
            source,
        }
    }

    /// The path the failing operation was working on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::OracleInvocation { path, .. }
            | Self::OracleParse { path, .. }
            | Self::PathAccess { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = ScanError::OracleParse {
            path: PathBuf::from("/data"),
            output: "garbage".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot parse size of '/data' from \"garbage\""
        );

        let err = ScanError::access(
            "/root/secret",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );
        assert!(err.to_string().starts_with("cannot access '/root/secret'"));
        assert_eq!(err.path(), std::path::Path::new("/root/secret"));
    }
}
