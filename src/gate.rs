//! The pending gate: mutual exclusion for send-class operations.
//!
//! The bridge serves one conversation at a time, so the session allows at
//! most one chat/image/probe request in flight. The gate expresses that
//! rule as scoped acquisition: [`PendingGate::try_engage`] hands out a
//! permit, and the gate releases when the permit drops, on every exit
//! path. Read-only metadata fetches never touch the gate.

use std::sync::Arc;

use tokio::sync::{Semaphore, TryAcquireError};

/// Single-permit gate serializing send-class operations.
#[derive(Debug, Clone)]
pub struct PendingGate {
    permits: Arc<Semaphore>,
}

/// Proof that the gate is held. Dropping it releases the gate.
#[derive(Debug)]
pub struct PendingPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
}

impl PendingGate {
    /// Creates a new, disengaged gate.
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Attempts to engage the gate without waiting.
    ///
    /// Returns `None` when another operation already holds it.
    pub fn try_engage(&self) -> Option<PendingPermit> {
        match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => Some(PendingPermit { _permit: permit }),
            Err(TryAcquireError::NoPermits) => None,
            Err(TryAcquireError::Closed) => None,
        }
    }

    /// Returns true while a permit is outstanding.
    pub fn is_engaged(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

impl Default for PendingGate {
    fn default() -> Self {
        Self::new()
    }
}
