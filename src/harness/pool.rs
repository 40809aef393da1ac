//! Bounded worker pool.
//!
//! Jobs run on a multi-threaded Tokio runtime; a semaphore caps how many compiler processes exist at once. Finished
//! outcomes travel back over a channel and are handed to the caller's callback on the calling thread, one at a time,
//! in completion order. No ordering or fairness between jobs is guaranteed.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};

use super::{ExecutionOutcome, HarnessError, TestExecutor, TestJob, UnitOutcome};

/// Runs [`TestJob`]s through a [`TestExecutor`] with bounded parallelism.
pub struct WorkerPool<E> {
    executor: Arc<E>,
    size: NonZeroUsize,
}

impl<E: TestExecutor> WorkerPool<E> {
    pub fn new(executor: E, size: NonZeroUsize) -> Self {
        Self {
            executor: Arc::new(executor),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// Run every job to completion (or timeout), calling `on_outcome` once per job as results arrive.
    ///
    /// ## Errors
    /// - [`HarnessError::Runtime`] if the worker runtime cannot be started. Per-job failures are reported through the
    ///   outcome instead.
    pub fn run<F>(&self, jobs: Vec<TestJob>, mut on_outcome: F) -> Result<(), HarnessError>
    where
        F: FnMut(UnitOutcome),
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.size.get())
            .thread_name("unskip-worker")
            .enable_all()
            .build()
            .map_err(HarnessError::Runtime)?;

        runtime.block_on(async {
            let permits = Arc::new(Semaphore::new(self.size.get()));
            let (tx, mut rx) = mpsc::unbounded_channel::<UnitOutcome>();

            for job in jobs {
                let executor = Arc::clone(&self.executor);
                let permits = Arc::clone(&permits);
                let tx = tx.clone();

                tokio::spawn(async move {
                    let outcome = match permits.acquire_owned().await {
                        Ok(_permit) => executor.execute(&job).await,
                        Err(e) => ExecutionOutcome::HarnessFailed(e.to_string()),
                    };
                    let _ = tx.send(UnitOutcome {
                        key: job.key,
                        name: job.name,
                        outcome,
                    });
                });
            }
            drop(tx);

            while let Some(outcome) = rx.recv().await {
                on_outcome(outcome);
            }
        });

        Ok(())
    }
}
