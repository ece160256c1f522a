//! SQLite storage layer.
//!
//! Repository and hook implementations backed by SQLite with WAL mode and
//! split read/write connection pools.

pub mod notification;
pub mod pool;
pub mod submission;
