use crate::domain::error::PoolError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinHandle};
use tracing::error;

pub const DEFAULT_WORKERS: usize = 4;

/// Bounded gateway to tokio's blocking threads for model and index work.
///
/// At most `size` jobs run at once; further submissions wait for a permit.
/// Jobs are never retried. A panicking job reports `WorkerPanicked` and
/// releases its permit like any other.
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

/// Pending result of a submitted job.
pub struct JobHandle<T> {
    task: JoinHandle<T>,
}

impl<T> JobHandle<T> {
    pub async fn join(self) -> Result<T, PoolError> {
        self.task.await.map_err(join_error)
    }
}

fn join_error(e: JoinError) -> PoolError {
    if e.is_panic() {
        error!("blocking job panicked");
        PoolError::WorkerPanicked
    } else {
        PoolError::Closed
    }
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Wait for a free slot, start `f` on a blocking thread and return a
    /// handle to await its result.
    pub async fn spawn<F, T>(&self, f: F) -> Result<JobHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit: OwnedSemaphorePermit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f()
        });
        Ok(JobHandle { task })
    }

    /// Submit `f` and wait for it to finish.
    pub async fn run<F, T>(&self, f: F) -> Result<T, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.spawn(f).await?.join().await
    }
}
