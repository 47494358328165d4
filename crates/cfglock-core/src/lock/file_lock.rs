use super::acquire::{acquire_with_retry, AcquireRequest};
use super::escalation::{escalation_for_policy, Escalation};
use super::marker::marker_path_for;
use super::{LockError, LockGuard};
use crate::config::LockConfig;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Exclusive lock on a resource, represented by a `<resource>.lock` marker.
///
/// Each contender (thread or process) owns its own `FileLock`; the
/// create-new semantics of the file system decide who wins. The marker is
/// removed by [`release`](FileLock::release), by dropping a [`LockGuard`],
/// or as a last resort when the `FileLock` itself is dropped.
pub struct FileLock {
    resource_path: PathBuf,
    marker_path: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
    escalation: Option<Box<dyn Escalation>>,
    handle: Option<File>,
}

impl FileLock {
    /// Creates an unheld lock for `resource_path` with default settings.
    pub fn new(resource_path: impl Into<PathBuf>) -> Self {
        Self::from_config(resource_path, &LockConfig::default())
    }

    /// Creates an unheld lock using the timing and timeout policy of `config`.
    pub fn from_config(resource_path: impl Into<PathBuf>, config: &LockConfig) -> Self {
        let resource_path = resource_path.into();
        let marker_path = marker_path_for(&resource_path);

        Self {
            resource_path,
            marker_path,
            timeout: config.timeout(),
            poll_interval: config.poll_interval(),
            escalation: escalation_for_policy(config.on_timeout),
            handle: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Sets who is asked once the timeout has passed.
    pub fn with_escalation(mut self, escalation: impl Escalation + 'static) -> Self {
        self.escalation = Some(Box::new(escalation));
        self
    }

    /// Non-interactive mode: timeouts always abort.
    pub fn without_escalation(mut self) -> Self {
        self.escalation = None;
        self
    }

    pub fn resource_path(&self) -> &Path {
        &self.resource_path
    }

    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn is_held(&self) -> bool {
        self.handle.is_some()
    }

    /// Becomes the exclusive holder of the marker.
    ///
    /// Polls every `poll_interval` while the marker exists. Once `timeout`
    /// has elapsed the escalation decides: `Force` deletes the marker and
    /// retries immediately, `Abort` (or no escalation) returns
    /// [`LockError::Timeout`]. Errors other than contention are returned
    /// right away as [`LockError::Io`].
    ///
    /// Calling this while already held does nothing.
    pub fn acquire(&mut self) -> Result<(), LockError> {
        if self.is_held() {
            return Ok(());
        }

        let request = AcquireRequest {
            resource_path: &self.resource_path,
            marker_path: &self.marker_path,
            timeout: self.timeout,
            poll_interval: self.poll_interval,
            escalation: self.escalation.as_deref(),
        };

        let file = acquire_with_retry(&request)?;
        self.handle = Some(file);
        Ok(())
    }

    /// Closes the marker handle and deletes the marker.
    ///
    /// Does nothing when not held. A marker that has already disappeared
    /// counts as released. After any outcome the lock is no longer held.
    pub fn release(&mut self) -> Result<(), LockError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        drop(handle);

        match fs::remove_file(&self.marker_path) {
            Ok(()) => {
                tracing::debug!(resource = %self.resource_path.display(), "lock released");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    marker = %self.marker_path.display(),
                    "lock marker already removed"
                );
                Ok(())
            }
            Err(e) => Err(LockError::io(e, &self.marker_path, "remove lock marker")),
        }
    }

    /// Acquires if needed and returns a guard that releases on scope exit.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cfglock_core::lock::FileLock;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut lock = FileLock::new("/tmp/pipeline.json");
    /// {
    ///     let _guard = lock.lock()?;
    ///     // Critical section here
    /// } // Released here, also on `?` or panic
    /// assert!(!lock.is_held());
    /// # Ok(())
    /// # }
    /// ```
    pub fn lock(&mut self) -> Result<LockGuard<'_>, LockError> {
        self.acquire()?;
        Ok(LockGuard { lock: self })
    }
}

impl fmt::Debug for FileLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLock")
            .field("resource_path", &self.resource_path)
            .field("marker_path", &self.marker_path)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("escalation", &self.escalation.is_some())
            .field("held", &self.is_held())
            .finish()
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(
                resource = %self.resource_path.display(),
                error = %e,
                "failed to release abandoned lock"
            );
        }
    }
}
