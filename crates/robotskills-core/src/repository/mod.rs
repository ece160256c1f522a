//! Repository trait definitions (ports).
//!
//! The infrastructure layer (robotskills-infra) implements these traits; the
//! core crate never depends on a storage technology. `memory` holds the
//! in-process implementation used by tests and dry runs.

pub mod memory;
pub mod submission;

pub use memory::InMemorySubmissionRepository;
pub use submission::{SubmissionFilter, SubmissionRepository, Transition};
