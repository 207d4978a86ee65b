//! Size oracle: how many bytes live at a path
//!
//! Files and symlinks are measured directly from their metadata. Directories
//! are measured by an external disk-usage command, whose answer is taken as
//! ground truth.

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{Result, ScanError};

/// Size used for paths that are neither file, symlink nor directory.
pub const FALLBACK_SIZE: u64 = 1;

/// Default disk-usage program.
pub const DEFAULT_DU_PROGRAM: &str = "du";

/// Reports the size in bytes of an existing path.
pub trait SizeOracle {
    fn size_of(&self, path: &Path) -> Result<u64>;
}

impl<T: SizeOracle + ?Sized> SizeOracle for &T {
    fn size_of(&self, path: &Path) -> Result<u64> {
        (**self).size_of(path)
    }
}

/// Oracle backed by `du -s --bytes`.
#[derive(Debug, Clone)]
pub struct DuOracle {
    program: String,
}

impl DuOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn measure_dir(&self, path: &Path) -> Result<u64> {
        debug!(path = %path.display(), "scanning");
        let output = Command::new(&self.program)
            .args(["-s", "--bytes"])
            .arg(path)
            .output()
            .map_err(|e| ScanError::OracleInvocation {
                path: path.to_path_buf(),
                reason: format!("failed to run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::OracleInvocation {
                path: path.to_path_buf(),
                reason: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }

        parse_du_output(path, &String::from_utf8_lossy(&output.stdout))
    }
}

impl Default for DuOracle {
    fn default() -> Self {
        Self::new(DEFAULT_DU_PROGRAM)
    }
}

impl SizeOracle for DuOracle {
    fn size_of(&self, path: &Path) -> Result<u64> {
        let meta = path
            .symlink_metadata()
            .map_err(|e| ScanError::access(path, e))?;
        let file_type = meta.file_type();

        if file_type.is_symlink() || file_type.is_file() {
            return Ok(meta.len());
        }
        if file_type.is_dir() {
            return self.measure_dir(path);
        }

        warn!(path = %path.display(), "not a file or directory, counting {} byte", FALLBACK_SIZE);
        Ok(FALLBACK_SIZE)
    }
}

/// Parse the byte count from the first token of `du` output.
///
/// `du` prints `<bytes>\t<path>`; only the leading token matters.
pub fn parse_du_output(path: &Path, stdout: &str) -> Result<u64> {
    stdout
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| ScanError::OracleParse {
            path: path.to_path_buf(),
            output: stdout.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDir;

    #[test]
    fn test_parse_du_output() {
        let path = Path::new("/var");
        assert_eq!(parse_du_output(path, "12345\t/var\n").unwrap(), 12345);
        assert_eq!(parse_du_output(path, "  77 /var").unwrap(), 77);
        assert_eq!(parse_du_output(path, "0\t/var").unwrap(), 0);
    }

    #[test]
    fn test_parse_du_output_rejects_garbage() {
        let path = Path::new("/var");
        for bad in ["", "\n", "abc\t/var", "-5\t/var", "12.5\t/var"] {
            match parse_du_output(path, bad) {
                Err(ScanError::OracleParse { path, .. }) => assert_eq!(path, Path::new("/var")),
                other => panic!("expected parse error for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_file_size_from_metadata() {
        let dir = TestDir::new();
        let file = dir.add_file("data.bin", 1234);
        let oracle = DuOracle::default();
        assert_eq!(oracle.size_of(&file).unwrap(), 1234);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_not_followed() {
        let dir = TestDir::new();
        dir.add_file("big.bin", 50_000);
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("big.bin"), &link).unwrap();

        let size = DuOracle::default().size_of(&link).unwrap();
        assert!(size < 50_000, "symlink measured as its target: {}", size);
    }

    #[test]
    fn test_missing_path_is_access_error() {
        let dir = TestDir::new();
        let missing = dir.path().join("nope");
        match DuOracle::default().size_of(&missing) {
            Err(ScanError::PathAccess { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected access error, got {:?}", other),
        }
    }

    #[test]
    fn test_unrunnable_program_is_invocation_error() {
        let dir = TestDir::new();
        let oracle = DuOracle::new("duflat-no-such-program");
        match oracle.size_of(dir.path()) {
            Err(ScanError::OracleInvocation { reason, .. }) => {
                assert!(reason.contains("duflat-no-such-program"))
            }
            other => panic!("expected invocation error, got {:?}", other),
        }
    }

    #[test]
    fn test_failing_program_is_invocation_error() {
        let dir = TestDir::new();
        let oracle = DuOracle::new("false");
        assert!(matches!(
            oracle.size_of(dir.path()),
            Err(ScanError::OracleInvocation { .. })
        ));
    }

    #[test]
    fn test_directory_measured_by_du() {
        let dir = TestDir::new();
        dir.add_file("a.bin", 3000);
        dir.add_file("sub/b.bin", 4000);
        let size = DuOracle::default().size_of(dir.path()).unwrap();
        assert!(size >= 7000, "du total {} smaller than file contents", size);
    }
}
