//! HTTP request handlers, grouped by resource.

pub mod groups;
pub mod inspections;
pub mod users;
