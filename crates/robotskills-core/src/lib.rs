//! Business logic and repository trait definitions for RobotSkills.
//!
//! This crate defines the "ports" (repository and hook traits) that the
//! infrastructure layer implements. It depends only on `robotskills-types`,
//! never on `robotskills-infra` or any database/IO crate.

pub mod hook;
pub mod repository;
pub mod review;
pub mod validation;
pub mod workflow;
