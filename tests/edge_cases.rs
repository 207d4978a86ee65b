//! Edge case and error handling tests for duflat


use harness::{TestDir, du_total, parse_lines, run_duflat, scan};
use std::os::unix::fs::symlink;

// ============================================================================
// Unusual roots
// ============================================================================

#[test]
fn test_missing_root() {
    let dir = TestDir::new();
    let (stdout, stderr, success) = run_duflat(dir.path(), &["--dir", "does-not-exist"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(
        stderr.contains("duflat: cannot access 'does-not-exist'"),
        "{}",
        stderr
    );
}

#[test]
fn test_empty_root() {
    let dir = TestDir::new();
    let (stdout, _stderr, success) = scan(&dir, &["-n", "5"]);
    assert!(success);
    let lines = parse_lines(&stdout);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, du_total(dir.path()));
}

#[test]
fn test_file_as_root() {
    let dir = TestDir::new();
    dir.add_file("only.bin", 4321);
    // A file root never needs du
    let (stdout, stderr, success) = run_duflat(
        dir.path(),
        &["only.bin", "-n", "4", "--du-program", "duflat-no-such-program"],
    );
    assert!(success, "{}", stderr);
    assert_eq!(parse_lines(&stdout), vec![(4321, "only.bin".to_string())]);
}

#[test]
fn test_relative_root_keeps_relative_paths() {
    let dir = TestDir::new();
    dir.add_file("data/big.bin", 9000);
    dir.add_file("data/small.bin", 100);
    let (stdout, _stderr, success) = run_duflat(dir.path(), &["-d", "data", "-n", "2"]);
    assert!(success);
    let lines = parse_lines(&stdout);
    assert_eq!(lines[0].1, "data");
    assert_eq!(lines[1], (9000, "data/big.bin".to_string()));
}

// ============================================================================
// Oracle failures
// ============================================================================

#[test]
fn test_failing_du_aborts() {
    let dir = TestDir::new();
    dir.add_file("a.bin", 10);
    let (stdout, stderr, success) = scan(&dir, &["--du-program", "false"]);
    assert!(!success);
    assert!(stdout.is_empty(), "no partial output expected: {}", stdout);
    assert!(stderr.contains("duflat: cannot measure"), "{}", stderr);
}

#[test]
fn test_unparseable_du_output_aborts() {
    let dir = TestDir::new();
    dir.add_file("a.bin", 10);
    // `echo -s --bytes DIR` prints no number first
    let (_stdout, stderr, success) = scan(&dir, &["--du-program", "echo"]);
    assert!(!success);
    assert!(stderr.contains("duflat: cannot parse size"), "{}", stderr);
}

// ============================================================================
// Ignore set
// ============================================================================

#[test]
fn test_ignored_names_are_not_reported() {
    let dir = TestDir::new();
    dir.add_file("disk.iso", 9000);
    dir.add_file("keep.bin", 3000);
    dir.add_file("other.bin", 2500);

    let (stdout, stderr, success) = scan(&dir, &["-n", "3", "-I", "*.iso"]);
    assert!(success, "{}", stderr);
    assert!(!stdout.contains("disk.iso"), "{}", stdout);

    // Ignored entries still count towards the root
    let lines = parse_lines(&stdout);
    assert_eq!(lines.iter().map(|(s, _)| s).sum::<u64>(), du_total(dir.path()));
}

#[test]
fn test_ignored_path() {
    let dir = TestDir::new();
    let cache = dir.add_dir("cache");
    dir.add_file("cache/blob", 9000);
    dir.add_file("keep.bin", 3000);

    let cache_arg = cache.to_string_lossy().to_string();
    let (stdout, _stderr, success) = scan(&dir, &["-n", "3", "-I", &cache_arg]);
    assert!(success);
    assert!(!stdout.contains("cache"), "{}", stdout);
}

// ============================================================================
// Symlinks
// ============================================================================

#[test]
fn test_symlinked_directory_not_descended() {
    let dir = TestDir::new();
    let real = TestDir::new();
    real.add_file("huge.bin", 50_000);
    dir.add_file("local.bin", 2000);
    symlink(real.path(), dir.path().join("link")).expect("Failed to create symlink");

    let (stdout, stderr, success) = scan(&dir, &["-n", "5"]);
    assert!(success, "{}", stderr);
    assert!(!stdout.contains("huge.bin"), "{}", stdout);
    let lines = parse_lines(&stdout);
    assert_eq!(lines.iter().map(|(s, _)| s).sum::<u64>(), du_total(dir.path()));
}

#[test]
fn test_symlink_to_parent_no_infinite_loop() {
    let dir = TestDir::new();
    dir.add_file("subdir/file.bin", 5000);
    symlink("..", dir.path().join("subdir").join("parent")).expect("Failed to create symlink");

    let (stdout, _stderr, success) = scan(&dir, &["-n", "10"]);
    assert!(success, "duflat should not loop on a parent symlink");
    assert!(stdout.contains("file.bin"));
}
