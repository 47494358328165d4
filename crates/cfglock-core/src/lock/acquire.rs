//! Marker acquisition with polling, timeout and escalation

use super::escalation::{timeout_message, Escalation, EscalationDecision};
use super::marker::{read_marker_owner, MarkerInfo};
use super::LockError;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

const PROGRESS_MESSAGE_THRESHOLD: Duration = Duration::from_secs(2);

pub(crate) struct AcquireRequest<'a> {
    pub(crate) resource_path: &'a Path,
    pub(crate) marker_path: &'a Path,
    pub(crate) timeout: Duration,
    pub(crate) poll_interval: Duration,
    pub(crate) escalation: Option<&'a dyn Escalation>,
}

/// Creates the marker, retrying while another holder owns it
pub(crate) fn acquire_with_retry(request: &AcquireRequest<'_>) -> Result<File, LockError> {
    acquire_with_remover(request, |marker_path| fs::remove_file(marker_path))
}

/// Retry loop with the forced-removal step supplied by the caller
pub(crate) fn acquire_with_remover<R>(
    request: &AcquireRequest<'_>,
    remove_marker: R,
) -> Result<File, LockError>
where
    R: Fn(&Path) -> io::Result<()>,
{
    let start = Instant::now();
    let mut progress_shown = false;

    loop {
        match create_marker(request.marker_path) {
            Ok(file) => {
                tracing::debug!(
                    resource = %request.resource_path.display(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "lock acquired"
                );
                return Ok(file);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let elapsed = start.elapsed();

                if elapsed >= request.timeout {
                    match escalate(request) {
                        EscalationDecision::Force => {
                            remove_marker_forcibly(request, &remove_marker)?;
                            // Timer is not reset: another collision asks again
                            continue;
                        }
                        EscalationDecision::Abort => {
                            return Err(LockError::Timeout {
                                resource: request.resource_path.to_path_buf(),
                                waited: elapsed,
                            });
                        }
                    }
                }

                if !progress_shown && elapsed >= PROGRESS_MESSAGE_THRESHOLD {
                    tracing::info!(
                        resource = %request.resource_path.display(),
                        marker = %request.marker_path.display(),
                        "waiting for lock held by another process"
                    );
                    progress_shown = true;
                }

                tracing::debug!(
                    resource = %request.resource_path.display(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "lock busy, retrying"
                );
                thread::sleep(request.poll_interval);
            }
            Err(e) => {
                return Err(LockError::io(e, request.marker_path, "create lock marker"));
            }
        }
    }
}

/// Atomic create-new; fails with `AlreadyExists` while someone holds the lock
fn create_marker(marker_path: &Path) -> io::Result<File> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(marker_path)?;

    // Owner record is informational, the lock is ours either way
    if let Err(e) = MarkerInfo::current().write_to(&mut file) {
        tracing::warn!(
            marker = %marker_path.display(),
            error = %e,
            "failed to record lock owner"
        );
    }

    Ok(file)
}

fn escalate(request: &AcquireRequest<'_>) -> EscalationDecision {
    let Some(escalation) = request.escalation else {
        return EscalationDecision::Abort;
    };

    let owner = read_marker_owner(request.marker_path);
    let message = timeout_message(request.resource_path, owner.as_ref());

    tracing::warn!(
        resource = %request.resource_path.display(),
        timeout_ms = request.timeout.as_millis() as u64,
        "lock wait timed out, escalating"
    );

    escalation.decide(&message)
}

fn remove_marker_forcibly<R>(
    request: &AcquireRequest<'_>,
    remove_marker: &R,
) -> Result<(), LockError>
where
    R: Fn(&Path) -> io::Result<()>,
{
    match remove_marker(request.marker_path) {
        Ok(()) => {
            tracing::warn!(
                resource = %request.resource_path.display(),
                marker = %request.marker_path.display(),
                "forcibly removed lock marker"
            );
            Ok(())
        }
        // Holder released in the meantime
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LockError::io(
            e,
            request.marker_path,
            "remove stale lock marker",
        )),
    }
}
