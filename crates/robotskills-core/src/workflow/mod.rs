//! Submission workflow: the transition table and the service that enforces it.

pub mod service;
pub mod transitions;

pub use service::{HookDispatch, SubmissionService, PLATFORM_ACTOR};
pub use transitions::{allowed_targets, can_transition};
