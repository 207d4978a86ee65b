//! Directory entry listing with an explicit ignore set

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::info;

use crate::error::{Result, ScanError};

/// Pseudo filesystems skipped unless defaults are disabled.
pub const DEFAULT_IGNORED_PATHS: &[&str] = &["/proc", "/sys"];

/// Lists the immediate children of a directory.
///
/// Order is unspecified; callers sort. Non-directories have no children.
pub trait EntryLister {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

impl<T: EntryLister + ?Sized> EntryLister for &T {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        (**self).list(dir)
    }
}

/// Paths and name patterns that are never listed.
///
/// An entry containing `/` is an exact path; anything else is a glob matched
/// against the file name (`*.iso`, `node_modules`).
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore set holding the pseudo filesystems.
    pub fn with_defaults() -> Self {
        let mut set = Self::new();
        for path in DEFAULT_IGNORED_PATHS {
            set.add(path);
        }
        set
    }

    /// Add a path or pattern. Invalid globs fall back to literal names.
    pub fn add(&mut self, entry: &str) {
        if entry.contains('/') {
            self.paths.push(PathBuf::from(entry));
        } else {
            let pattern = Pattern::new(entry)
                .unwrap_or_else(|_| Pattern::new(&Pattern::escape(entry)).unwrap_or_default());
            self.patterns.push(pattern);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.patterns.is_empty()
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.paths.iter().any(|p| p == path) {
            return true;
        }
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        self.patterns.iter().any(|p| p.matches(&name))
    }
}

/// Lister reading the real filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsLister {
    ignore: IgnoreSet,
}

impl FsLister {
    pub fn new(ignore: IgnoreSet) -> Self {
        Self { ignore }
    }
}

impl EntryLister for FsLister {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        // Symlinked directories are not descended into
        let is_dir = dir
            .symlink_metadata()
            .map(|m| m.is_dir())
            .map_err(|e| ScanError::access(dir, e))?;
        if !is_dir {
            return Ok(Vec::new());
        }

        let mut children = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| ScanError::access(dir, e))? {
            let path = entry.map_err(|e| ScanError::access(dir, e))?.path();
            if self.ignore.is_ignored(&path) {
                info!(path = %path.display(), "ignoring");
                continue;
            }
            children.push(path);
        }
        Ok(children)
    }
}
