//! # ADA Common Library
//!
//! Shared code for the ADA Media Integrity mock services:
//! - Error type used by startup and configuration paths
//! - Bootstrap configuration (TOML file, environment, compiled defaults)
//! - API request/response types consumed by the mobile client
//! - Time and identifier helpers

pub mod api;
pub mod config;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
