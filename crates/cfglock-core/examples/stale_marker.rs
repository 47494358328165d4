//! Helper binary that dies while holding a lock
//!
//! Usage: stale_marker <resource_path>
//!
//! Acquires the lock and exits without running destructors, leaving
//! `<resource_path>.lock` behind the way a crashed process would.

use cfglock_core::lock::FileLock;
use std::env;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: stale_marker <resource_path>");
        std::process::exit(1);
    }

    let mut lock = FileLock::new(PathBuf::from(&args[1]));
    lock.acquire().expect("Failed to acquire lock");

    println!("Holding {}", lock.marker_path().display());

    // Skips Drop for `lock`
    std::process::exit(0);
}
