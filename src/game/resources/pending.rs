//! Deferred opponent move scheduling
//!
//! Scripted puzzle replies and bot replies land a fixed delay after the
//! player's move. [`DelayedMoveScheduler`] holds at most one such action:
//! scheduling a new one replaces (and therefore cancels) whatever was
//! pending, so a rapid reset can never apply two replies.
//!
//! Every schedule gets a new generation number. Callers can keep it to tell
//! whether the action they queued is still the one pending.

use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
struct PendingMove<T> {
    action: T,
    remaining: Duration,
    generation: u64,
}

/// Single-slot, cancelable deferred action
#[derive(Debug, Clone)]
pub struct DelayedMoveScheduler<T> {
    pending: Option<PendingMove<T>>,
    generation: u64,
}

impl<T> Default for DelayedMoveScheduler<T> {
    fn default() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }
}

impl<T: std::fmt::Debug> DelayedMoveScheduler<T> {
    /// Queue `action` to fire once `delay` of frame time has passed
    ///
    /// Any previously pending action is dropped without firing.
    pub fn schedule(&mut self, action: T, delay: Duration) -> u64 {
        if let Some(previous) = self.pending.take() {
            debug!(
                "[SCHEDULER] Replacing pending action {:?} (generation {})",
                previous.action, previous.generation
            );
        }

        self.generation += 1;
        self.pending = Some(PendingMove {
            action,
            remaining: delay,
            generation: self.generation,
        });
        self.generation
    }

    /// Drop the pending action, returning whether there was one
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Generation of the pending action, if any
    pub fn pending_generation(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.generation)
    }

    /// Feed frame time; returns the action once its delay has elapsed
    pub fn advance(&mut self, delta: Duration) -> Option<T> {
        let pending = self.pending.as_mut()?;
        pending.remaining = pending.remaining.saturating_sub(delta);

        if pending.remaining.is_zero() {
            self.pending.take().map(|p| p.action)
        } else {
            None
        }
    }
}
