//! Background execution of pipeline runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tokio::sync::oneshot;
use tracing::{error, info};
use uuid::Uuid;

use seedforge_core::{SkuSource, StoreSource};

use crate::pipeline::{Pipeline, PipelineRequest, PipelineResult, PipelineStatus};

/// Progress of a submitted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineJobStatus {
    Running,
    /// The run ended; carries the final pipeline status.
    Finished(PipelineStatus),
    /// The worker thread panicked before the run ended.
    Panicked,
}

/// Marks a job as panicked if its worker unwinds before reporting.
struct WorkerGuard {
    id: Uuid,
    status: Arc<Mutex<PipelineJobStatus>>,
}

impl WorkerGuard {
    fn finish(&self, final_status: PipelineStatus) {
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) =
            PipelineJobStatus::Finished(final_status);
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        if *status == PipelineJobStatus::Running {
            *status = PipelineJobStatus::Panicked;
            error!(event = "job_panicked", job_id = %self.id);
        }
    }
}

/// Runs pipelines on background threads.
///
/// Every submitted run gets its own state and cancel flag; runs share only
/// the pipeline's configuration and collaborators.
#[derive(Debug, Clone)]
pub struct PipelineManager {
    pipeline: Arc<Pipeline>,
}

impl PipelineManager {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Starts a run on a new thread and returns its handle.
    pub fn submit<S, K>(&self, stores: S, skus: K, request: PipelineRequest) -> PipelineHandle
    where
        S: StoreSource + Send + 'static,
        K: SkuSource + Send + 'static,
    {
        let id = Uuid::new_v4();
        let cancel = Arc::new(AtomicBool::new(false));
        let status = Arc::new(Mutex::new(PipelineJobStatus::Running));
        let (sender, receiver) = oneshot::channel();

        let pipeline = Arc::clone(&self.pipeline);
        let worker_cancel = Arc::clone(&cancel);
        let guard = WorkerGuard {
            id,
            status: Arc::clone(&status),
        };

        info!(event = "job_submitted", job_id = %id);
        thread::spawn(move || {
            // Dropped before `sender` on unwind, so waiters see the status.
            let guard = guard;
            let result = pipeline.run_with_cancel(&stores, &skus, request, &worker_cancel);
            let final_status = match &result {
                Ok(state) => state.status,
                Err(failure) => failure.state.status,
            };
            guard.finish(final_status);
            info!(event = "job_finished", job_id = %id, status = %final_status);
            // The handle may already be dropped.
            let _ = sender.send(result);
        });

        PipelineHandle {
            id,
            cancel,
            status,
            receiver,
        }
    }
}

/// Handle to one background run.
#[derive(Debug)]
pub struct PipelineHandle {
    id: Uuid,
    cancel: Arc<AtomicBool>,
    status: Arc<Mutex<PipelineJobStatus>>,
    receiver: oneshot::Receiver<PipelineResult>,
}

impl PipelineHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Asks the run to stop before its next stage.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelling(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> PipelineJobStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Waits for the run to end.
    ///
    /// Returns `None` only if the worker thread panicked, in which case
    /// [`status`](Self::status) reports [`PipelineJobStatus::Panicked`].
    pub async fn wait(self) -> Option<PipelineResult> {
        self.receiver.await.ok()
    }

    /// Blocking variant of [`wait`](Self::wait). Must not be called from
    /// within an async runtime.
    pub fn blocking_wait(self) -> Option<PipelineResult> {
        self.receiver.blocking_recv().ok()
    }
}
