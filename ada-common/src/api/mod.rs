//! Shared API utilities

pub mod types;
