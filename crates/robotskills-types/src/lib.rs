//! Shared domain types for RobotSkills.
//!
//! This crate contains the domain types of the skill submission workflow:
//! Submission, the five section payloads, Platform Review Results, OEM
//! Decisions, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, semver, thiserror.

pub mod config;
pub mod error;
pub mod review;
pub mod section;
pub mod submission;
