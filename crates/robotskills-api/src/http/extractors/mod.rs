//! Request extractors and path parsing shared by handlers.

pub mod body;
pub mod path;
pub mod query;
