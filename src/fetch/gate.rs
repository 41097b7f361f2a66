//! Bounded concurrency gate.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{Error, Result};

/// Counting gate with a fixed number of slots.
///
/// Waiters are served in arrival order. Cloning the gate shares its slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held slot; dropping it releases the slot to the longest waiter.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Create a gate with `capacity` slots.
    ///
    /// A capacity of zero would block every caller forever and is rejected.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConcurrency(capacity));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> Result<GatePermit> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| Error::Other("concurrency gate closed".to_string()))?;
        Ok(GatePermit { _permit: permit })
    }

    /// Number of free slots.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
