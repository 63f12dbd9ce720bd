//! Networking - the client's side of the session backend
//!
//! # Components
//!
//! - [`SessionService`] / [`PuzzleSource`] - async traits for the backend
//! - [`InMemorySessionService`] - local implementation with failure knobs
//! - [`SessionLifecycleController`] - create/reconnect/forfeit/close requests
//!   and their loading/error/success status
//! - [`PendingTask`] - one in-flight tokio request, polled from `update`
//!
//! # Threading
//!
//! Requests run as tokio tasks. Their results are picked up by polling from
//! the owning context's `update`, never applied from inside the task, so all
//! session state stays on the caller's thread.

pub mod lifecycle;
pub mod local;
pub mod service;
pub mod task;

pub use lifecycle::{LifecycleAction, LifecycleReply, LifecycleStatus, SessionLifecycleController};
pub use local::InMemorySessionService;
pub use service::{
    PuzzleSource, ServiceError, ServiceResult, SessionConfig, SessionRecord, SessionService,
};
pub use task::PendingTask;
