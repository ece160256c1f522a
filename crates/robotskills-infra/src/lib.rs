//! Infrastructure layer for RobotSkills.
//!
//! Contains implementations of the traits defined in `robotskills-core`:
//! SQLite storage, transition hooks (notifications, storefront revalidation),
//! configuration loading and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod hook;
pub mod sqlite;
