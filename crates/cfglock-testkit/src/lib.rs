//! Helpers shared by cfglock tests: scratch directories, child-process
//! binaries, and waiting on marker files.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Scratch directory under `./.tmp/`, removed on drop.
///
/// Helper processes get paths inside it, so leftovers from a failed run
/// stay next to the crate.
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Path of a helper binary from `examples/`, as built by `cargo test`.
///
/// Test binaries run from `target/<profile>/deps/`, with the examples in
/// the sibling `examples/` directory.
pub fn example_bin(name: &str) -> PathBuf {
    let mut path = std::env::current_exe().expect("Failed to get current executable path");

    path.pop();
    path.pop();
    path.push("examples");
    path.push(name);

    if cfg!(target_os = "windows") {
        path.set_extension("exe");
    }

    path
}

/// Polls until `path` exists, returning `false` if `timeout` passes first
///
/// Used to wait for a child process to take a lock before contending for it.
pub fn wait_for_path(path: &Path, timeout: Duration) -> bool {
    let start = Instant::now();
    while !path.exists() {
        if start.elapsed() >= timeout {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_creates_in_tmp() {
        let temp = temp_dir_in_workspace();
        let path = temp.path();

        assert!(
            path.to_string_lossy().contains(".tmp"),
            "Path should contain .tmp, got: {}",
            path.display()
        );
        assert!(path.is_dir(), "Path should be a directory");
    }

    #[test]
    fn test_temp_dir_auto_cleanup() {
        let path = {
            let temp = temp_dir_in_workspace();
            let p = temp.path().to_path_buf();
            assert!(p.exists(), "Directory should exist before drop");
            p
        }; // temp dropped here

        assert!(!path.exists(), "Directory should be cleaned up after drop");
    }

    #[test]
    fn test_example_bin_points_into_examples() {
        let path = example_bin("lock_holder");
        let parent = path.parent().unwrap();

        assert_eq!(parent.file_name().unwrap(), "examples");
        assert_eq!(path.file_stem().unwrap(), "lock_holder");
    }

    #[test]
    fn test_wait_for_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("appears.lock");

        assert!(!wait_for_path(&target, Duration::from_millis(20)));

        std::fs::write(&target, "").unwrap();
        assert!(wait_for_path(&target, Duration::from_millis(20)));
    }
}
