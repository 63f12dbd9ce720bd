//! Session lifecycle requests and their status
//!
//! Each [`LifecycleAction`] owns one [`LifecycleStatus`] and one request slot:
//!
//! ```text
//! Idle ──issue──► Loading ──┬── succeed ──► Succeeded(msg) ──dismiss──► Idle
//!                           └── fail ─────► Failed(msg) ────dismiss──► Idle
//! ```
//!
//! Issuing an action while its previous request is still in flight aborts
//! the previous request. There is no client-side timeout: a request that
//! never answers keeps its action loading.
//!
//! The controller only moves requests and statuses around. Applying a reply
//! to the session (storing the record, replaying moves, clearing the board)
//! is the session context's job: it receives finished replies from
//! [`SessionLifecycleController::poll`] and reports back with
//! [`SessionLifecycleController::succeed`] or
//! [`SessionLifecycleController::fail`].

use std::fmt;
use std::future::Future;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::service::{ServiceError, ServiceResult, SessionRecord};
use super::task::PendingTask;
use crate::game::puzzle::PuzzleDefinition;

/// Remote session operations tracked by the lifecycle controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    Create,
    Reconnect,
    Forfeit,
    Close,
}

impl LifecycleAction {
    pub const ALL: [LifecycleAction; 4] = [
        LifecycleAction::Create,
        LifecycleAction::Reconnect,
        LifecycleAction::Forfeit,
        LifecycleAction::Close,
    ];

    fn index(self) -> usize {
        match self {
            LifecycleAction::Create => 0,
            LifecycleAction::Reconnect => 1,
            LifecycleAction::Forfeit => 2,
            LifecycleAction::Close => 3,
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleAction::Create => write!(f, "create"),
            LifecycleAction::Reconnect => write!(f, "reconnect"),
            LifecycleAction::Forfeit => write!(f, "forfeit"),
            LifecycleAction::Close => write!(f, "close"),
        }
    }
}

/// Loading/error/success flags of one action
///
/// `loading` implies neither message is set, and at most one of
/// `error`/`success` is set at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleStatus {
    loading: bool,
    error: Option<String>,
    success: Option<String>,
}

impl LifecycleStatus {
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
        self.success = None;
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = None;
        self.success = Some(message.into());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.success = None;
        self.error = Some(message.into());
    }

    /// Back to idle
    pub fn dismiss(&mut self) {
        *self = Self::default();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        !self.loading && self.error.is_none() && self.success.is_none()
    }
}

/// What a finished lifecycle request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleReply {
    /// New bot session
    Created(SessionRecord),
    /// The user's active session, if the backend has one
    Active(Option<SessionRecord>),
    /// Forfeit or close of the given session went through
    Terminated(Uuid),
    /// Puzzle fetched for a new puzzle session
    Puzzle(PuzzleDefinition),
}

/// In-flight lifecycle requests and per-action status
#[derive(Debug, Default)]
pub struct SessionLifecycleController {
    statuses: [LifecycleStatus; 4],
    requests: [PendingTask<ServiceResult<LifecycleReply>>; 4],
}

impl SessionLifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `request` for `action`, aborting the action's previous request
    ///
    /// Must be called from within a tokio runtime.
    pub fn issue<F>(&mut self, action: LifecycleAction, request: F)
    where
        F: Future<Output = ServiceResult<LifecycleReply>> + Send + 'static,
    {
        let i = action.index();
        if self.requests[i].spawn(request) {
            warn!("[SESSION] Aborted previous {} request", action);
        }
        self.statuses[i].start();
        debug!("[SESSION] {} request issued", action);
    }

    /// Finished requests since the last poll, in action order
    ///
    /// The action stays loading until the caller reports the outcome.
    pub fn poll(&mut self) -> Vec<(LifecycleAction, ServiceResult<LifecycleReply>)> {
        let mut finished = Vec::new();
        for action in LifecycleAction::ALL {
            let Some(result) = self.requests[action.index()].poll_finished() else {
                continue;
            };
            let result = result.unwrap_or_else(|e| {
                error!("[SESSION] {} request task failed: {}", action, e);
                Err(ServiceError::Unavailable(format!("{} request failed", action)))
            });
            finished.push((action, result));
        }
        finished
    }

    pub fn succeed(&mut self, action: LifecycleAction, message: impl Into<String>) {
        let message = message.into();
        info!("[SESSION] {} succeeded: {}", action, message);
        self.statuses[action.index()].succeed(message);
    }

    pub fn fail(&mut self, action: LifecycleAction, message: impl Into<String>) {
        let message = message.into();
        warn!("[SESSION] {} failed: {}", action, message);
        self.statuses[action.index()].fail(message);
    }

    /// Clear an action's status back to idle
    ///
    /// An in-flight request keeps running and still reports its outcome.
    pub fn dismiss(&mut self, action: LifecycleAction) {
        self.statuses[action.index()].dismiss();
    }

    /// Abort the action's request and clear its status
    pub fn cancel(&mut self, action: LifecycleAction) {
        let i = action.index();
        if self.requests[i].abort() {
            debug!("[SESSION] {} request cancelled", action);
        }
        self.statuses[i].dismiss();
    }

    pub fn status(&self, action: LifecycleAction) -> &LifecycleStatus {
        &self.statuses[action.index()]
    }

    pub fn is_pending(&self, action: LifecycleAction) -> bool {
        self.requests[action.index()].is_pending()
    }

    /// Whether any action is loading
    pub fn is_busy(&self) -> bool {
        self.statuses.iter().any(LifecycleStatus::is_loading)
    }
}
