//! Siteround Core — domain models, error taxonomy, authorization policy,
//! and repository trait definitions.
//!
//! These are the shared types every other crate builds on. This crate
//! performs no I/O.

pub mod error;
pub mod models;
pub mod policy;
pub mod repository;

pub use error::{SiteroundError, SiteroundResult};
