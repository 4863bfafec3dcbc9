//! Shared E2E test helpers.

pub mod config;
pub mod fake_source;
pub mod harness;
