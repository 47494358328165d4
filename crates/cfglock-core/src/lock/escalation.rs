//! Timeout escalation
//!
//! When the wait for a marker runs out, `FileLock` asks an [`Escalation`]
//! whether to break the marker. Interactive tools plug a prompt in here;
//! headless callers leave it unset, which always aborts.

use std::path::Path;

use super::marker::MarkerInfo;
use crate::config::TimeoutPolicy;

/// Outcome of an escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationDecision {
    /// Delete the existing marker and retry once more
    Force,
    /// Give up with `LockError::Timeout`
    Abort,
}

/// Decides whether a marker that outlived the timeout may be broken.
///
/// `message` names the resource and the data-loss risk, ready to be shown
/// to a user as-is.
pub trait Escalation: Send {
    fn decide(&self, message: &str) -> EscalationDecision;
}

impl<F> Escalation for F
where
    F: Fn(&str) -> EscalationDecision + Send,
{
    fn decide(&self, message: &str) -> EscalationDecision {
        self(message)
    }
}

/// Never breaks a marker
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnTimeout;

impl Escalation for AbortOnTimeout {
    fn decide(&self, _message: &str) -> EscalationDecision {
        EscalationDecision::Abort
    }
}

/// Always breaks a marker once the timeout has passed
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceOnTimeout;

impl Escalation for ForceOnTimeout {
    fn decide(&self, _message: &str) -> EscalationDecision {
        EscalationDecision::Force
    }
}

pub(crate) fn escalation_for_policy(policy: TimeoutPolicy) -> Option<Box<dyn Escalation>> {
    match policy {
        TimeoutPolicy::Abort => None,
        TimeoutPolicy::Force => Some(Box::new(ForceOnTimeout)),
    }
}

pub(crate) fn timeout_message(resource_path: &Path, owner: Option<&MarkerInfo>) -> String {
    let held_by = match owner {
        Some(info) => format!("The lock is held by {}.\n\n", info),
        None => String::new(),
    };

    format!(
        "This file seems to be in use by another process:\n\n{}\n\n{}\
         Forcing a write while another process is writing to it could result in data loss.\n\n\
         Do you want to force writing to this file?",
        resource_path.display(),
        held_by
    )
}
