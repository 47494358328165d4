//! RAII lock guard for automatic lock release

use super::{FileLock, LockError};
use std::ops::Deref;

/// RAII guard for a held [`FileLock`]
///
/// When this guard is dropped, the marker is removed. This ensures that
/// locks are always released, even in the presence of panics or early
/// returns.
#[derive(Debug)]
pub struct LockGuard<'a> {
    pub(crate) lock: &'a mut FileLock,
}

impl LockGuard<'_> {
    /// Releases now and reports failures that `Drop` would only log.
    pub fn release(self) -> Result<(), LockError> {
        // Drop runs afterwards and finds nothing left to release
        self.lock.release()
    }
}

impl Deref for LockGuard<'_> {
    type Target = FileLock;

    fn deref(&self) -> &FileLock {
        &*self.lock
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.release() {
            tracing::warn!(
                resource = %self.lock.resource_path().display(),
                error = %e,
                "failed to release lock on scope exit"
            );
        }
    }
}
