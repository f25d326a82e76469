//! In-memory session state and the queued persistence writer.
//!
//! Transitions are pure: they take the current context and return the next
//! one plus what changed. Persisting the result is a separate, explicit
//! step, normally by handing the new document to the [`WritebackQueue`].

pub mod state;
pub mod writeback;

pub use state::{SessionContext, Transition};
pub use writeback::WritebackQueue;
