//! Test utilities: an in-memory filesystem and temporary directories.
//!
//! This module is only compiled for tests and benchmarks.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Result, ScanError};
use crate::lister::EntryLister;
use crate::oracle::SizeOracle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    File,
    Dir,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    kind: Kind,
    own_size: u64,
}

/// In-memory filesystem acting as both size oracle and entry lister.
///
/// Directories are created implicitly for every file added. A directory's
/// size is its own size (zero unless set with [`FixtureTree::dir`]) plus
/// everything beneath it. Listings come back in reverse path order so callers
/// have to sort, and every listing is counted.
#[derive(Debug, Default)]
pub struct FixtureTree {
    entries: BTreeMap<PathBuf, Entry>,
    failing: BTreeSet<PathBuf>,
    list_calls: RefCell<BTreeMap<PathBuf, usize>>,
}

impl FixtureTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file of `size` bytes.
    pub fn file(mut self, path: &str, size: u64) -> Self {
        let path = PathBuf::from(path);
        self.add_parents(&path);
        self.entries.insert(
            path,
            Entry {
                kind: Kind::File,
                own_size: size,
            },
        );
        self
    }

    /// Add a directory, or set the own size of an existing one.
    pub fn dir(mut self, path: &str, own_size: u64) -> Self {
        let path = PathBuf::from(path);
        self.add_parents(&path);
        self.entries.insert(
            path,
            Entry {
                kind: Kind::Dir,
                own_size,
            },
        );
        self
    }

    /// Make the oracle fail for `path`.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(PathBuf::from(path));
        self
    }

    /// Number of times `path` was listed.
    pub fn list_calls(&self, path: &Path) -> usize {
        self.list_calls.borrow().get(path).copied().unwrap_or(0)
    }

    pub fn total_list_calls(&self) -> usize {
        self.list_calls.borrow().values().sum()
    }

    /// Every path listed at least once.
    pub fn listed_paths(&self) -> Vec<PathBuf> {
        self.list_calls.borrow().keys().cloned().collect()
    }

    fn add_parents(&mut self, path: &Path) {
        for parent in path.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }
            self.entries.entry(parent.to_path_buf()).or_insert(Entry {
                kind: Kind::Dir,
                own_size: 0,
            });
        }
    }

    fn entry(&self, path: &Path) -> Result<Entry> {
        self.entries.get(path).copied().ok_or_else(|| {
            ScanError::access(path, io::Error::from(io::ErrorKind::NotFound))
        })
    }
}

impl SizeOracle for FixtureTree {
    fn size_of(&self, path: &Path) -> Result<u64> {
        if self.failing.contains(path) {
            return Err(ScanError::OracleInvocation {
                path: path.to_path_buf(),
                reason: "injected failure".to_string(),
            });
        }
        let entry = self.entry(path)?;
        if entry.kind == Kind::File {
            return Ok(entry.own_size);
        }
        let below: u64 = self
            .entries
            .iter()
            .filter(|(p, _)| p.as_path() != path && p.starts_with(path))
            .map(|(_, e)| e.own_size)
            .sum();
        Ok(entry.own_size + below)
    }
}

impl EntryLister for FixtureTree {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        *self
            .list_calls
            .borrow_mut()
            .entry(dir.to_path_buf())
            .or_insert(0) += 1;

        if self.entry(dir)?.kind == Kind::File {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .keys()
            .rev()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }
}

/// A temporary directory populated with files of known sizes.
///
/// Removed when dropped.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file of `len` bytes, creating parent directories as needed.
    pub fn add_file(&self, path: &str, len: usize) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, vec![b'x'; len]).expect("Failed to write file");
        full_path
    }

    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}
