//! Bound on concurrent language model generations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::warn;

use crate::error::{AppError, AppResult};

/// Shared semaphore that generation handlers acquire before calling the model.
///
/// Requests wait up to `queue_timeout` for a slot and are then rejected with 503.
#[derive(Debug, Clone)]
pub struct GenerationLimiter {
    semaphore: Arc<Semaphore>,
    queue_timeout: Duration,
}

impl GenerationLimiter {
    pub fn new(max_concurrent: usize, queue_timeout: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            queue_timeout,
        }
    }

    /// Wait for a generation slot. The slot is released when the permit drops.
    pub async fn acquire(&self, operation: &str) -> AppResult<OwnedSemaphorePermit> {
        match tokio::time::timeout(self.queue_timeout, self.semaphore.clone().acquire_owned()).await
        {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_)) => Err(AppError::Internal(
                "Generation limiter is closed".to_string(),
            )),
            Err(_) => {
                warn!(
                    "{} rejected: no generation slot within {:?}",
                    operation, self.queue_timeout
                );
                Err(AppError::ServiceUnavailable(
                    "Too many generations in progress. Please try again later.".to_string(),
                ))
            }
        }
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
