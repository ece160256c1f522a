//! HTTP request handlers for the REST API.

pub mod section;
pub mod stats;
pub mod submission;
