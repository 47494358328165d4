//! Helper binary that acquires lock, writes to a log, holds, releases
//!
//! Usage: lock_holder <resource_path> <log_path> <process_id> [hold_ms]
//!
//! This binary is used to test cross-process exclusive locking.
//! It locks the resource, appends a line to the log file, holds the lock
//! for `hold_ms` (default 100), then releases it. Multiple processes running
//! this should execute sequentially.

use anyhow::{bail, Context, Result};
use cfglock_core::lock::FileLock;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 && args.len() != 5 {
        bail!("Usage: lock_holder <resource_path> <log_path> <process_id> [hold_ms]");
    }

    let resource_path = PathBuf::from(&args[1]);
    let log_path = PathBuf::from(&args[2]);
    let process_id = &args[3];
    let hold = match args.get(4) {
        Some(ms) => Duration::from_millis(ms.parse().context("hold_ms must be a number")?),
        None => Duration::from_millis(100),
    };

    let mut lock = FileLock::new(&resource_path)
        .with_timeout(Duration::from_secs(30))
        .without_escalation();
    let _guard = lock.lock().context("Failed to acquire lock")?;

    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;
    writeln!(log, "process_{} acquired lock", process_id).context("Failed to write log")?;

    // Hold lock to force the others to wait
    std::thread::sleep(hold);

    writeln!(log, "process_{} released lock", process_id).context("Failed to write log")?;

    // Lock released via guard drop
    println!("Process {} completed", process_id);
    Ok(())
}
