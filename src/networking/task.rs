//! Single-slot background task
//!
//! Requests run on tokio, but their results are applied on the caller's
//! thread during `update`. [`PendingTask`] holds at most one in-flight
//! request: spawning again aborts the previous one, polling hands back the
//! result only once the task has finished, and dropping the slot aborts
//! whatever is still running.
//!
//! [`PendingTask::spawn`] must be called from within a tokio runtime.

use futures_lite::future;
use std::future::Future;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

/// At most one in-flight async request
#[derive(Debug)]
pub struct PendingTask<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T> Default for PendingTask<T> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<T: Send + 'static> PendingTask<T> {
    /// Spawn `request`, aborting the previous one
    ///
    /// Returns whether a previous request was still running.
    pub fn spawn<F>(&mut self, request: F) -> bool
    where
        F: Future<Output = T> + Send + 'static,
    {
        let replaced = self.abort();
        self.handle = Some(tokio::spawn(request));
        replaced
    }

    /// Result of the finished request, `None` while running or idle
    ///
    /// An `Err` means the task panicked. Aborted tasks never report.
    pub fn poll_finished(&mut self) -> Option<Result<T, JoinError>> {
        let handle = self.handle.as_mut()?;
        if !handle.is_finished() {
            return None;
        }

        let result = future::block_on(future::poll_once(handle))?;
        self.handle = None;

        match result {
            Err(e) if e.is_cancelled() => {
                debug!("[TASK] Dropping result of cancelled request");
                None
            }
            other => Some(other),
        }
    }
}

impl<T> PendingTask<T> {
    /// Abort the running request, returning whether there was one
    pub fn abort(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                was_running
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

impl<T> Drop for PendingTask<T> {
    fn drop(&mut self) {
        self.abort();
    }
}
