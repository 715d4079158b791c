// src/checker/admission.rs
// =============================================================================
// Caps how many probes are in flight at once.
//
// A tokio Semaphore holds N permits. Each probing task acquires one before it
// touches the network and gives it back when the AdmissionSlot is dropped,
// whether the probe succeeded, failed, or the task panicked.
//
// Rust concepts:
// - RAII: the slot releases itself in Drop, so there is no release() to forget
// - Arc: the semaphore is shared by every task in the batch
// =============================================================================

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct AdmissionController {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Permission to have one probe in flight. Dropping it frees the slot.
#[derive(Debug)]
pub struct AdmissionSlot {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionController {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    // Waits until a slot is free. Waiters are served in FIFO order.
    //
    // Only fails if the semaphore has been closed, which this type never does.
    pub async fn acquire(&self) -> Result<AdmissionSlot, AcquireError> {
        let permit = self.semaphore.clone().acquire_owned().await?;
        Ok(AdmissionSlot { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
