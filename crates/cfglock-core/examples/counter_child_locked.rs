//! Counter helper WITH file locking
//!
//! Usage: counter_child_locked <counter_path> <iterations>
//!
//! Performs read-modify-write operations on a counter file, each inside
//! a `FileLock` on the counter. This should prevent lost updates.

use cfglock_core::lock::FileLock;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: counter_child_locked <counter_path> <iterations>");
        std::process::exit(1);
    }

    let counter_path = PathBuf::from(&args[1]);
    let iterations: usize = args[2].parse().expect("iterations must be a number");

    let mut lock = FileLock::new(&counter_path)
        .with_timeout(Duration::from_secs(10))
        .with_poll_interval(Duration::from_millis(2));

    for _ in 0..iterations {
        let _guard = lock.lock().expect("Failed to acquire lock");

        let content = fs::read_to_string(&counter_path).expect("Failed to read counter file");
        let value: u32 = content
            .trim()
            .parse()
            .expect("Counter file should contain a number");

        // Widen the race window
        std::thread::sleep(Duration::from_micros(10));

        fs::write(&counter_path, (value + 1).to_string()).expect("Failed to write counter file");
    }

    println!("Counter child completed {} iterations", iterations);
}
