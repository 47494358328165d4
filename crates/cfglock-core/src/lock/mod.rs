//! File locking module for process-level mutual exclusion
//!
//! A resource `path` is locked by atomically creating `path.lock` next to
//! it. Whoever creates the marker holds the lock; everyone else polls until
//! it disappears or their timeout runs out. The lock is advisory: only
//! processes using the same marker convention are excluded.

use std::path::Path;

mod acquire;
mod error;
mod escalation;
mod file_lock;
mod guard;
mod marker;

pub use error::LockError;
pub use escalation::{AbortOnTimeout, Escalation, EscalationDecision, ForceOnTimeout};
pub use file_lock::FileLock;
pub use guard::LockGuard;
pub use marker::{marker_path_for, read_marker_owner, MarkerInfo};

use crate::config::LockConfig;


/// Acquires the lock for `resource_path` using `config`.
///
/// The returned `FileLock` is held and removes its marker when dropped.
///
/// # Examples
///
/// ```no_run
/// use cfglock_core::{acquire_lock, LockConfig};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LockConfig::default();
/// let lock = acquire_lock(Path::new("/tmp/pipeline.json"), &config)?;
/// // Critical section here
/// drop(lock); // Explicit drop (automatic on scope exit)
/// # Ok(())
/// # }
/// ```
pub fn acquire_lock(resource_path: &Path, config: &LockConfig) -> Result<FileLock, LockError> {
    let mut lock = FileLock::from_config(resource_path, config);
    lock.acquire()?;
    Ok(lock)
}
