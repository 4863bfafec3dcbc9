//! E2E integration tests for dpvs-exporter.
//!
//! These tests start the real HTTP server on a loopback port against a
//! scripted stats source and scrape it over HTTP.
//!
//! # Test Structure
//!
//! - `helpers/` -- Shared test utilities (config builder, fake source, HTTP harness)
//! - `scenarios/` -- Test files organized by scenario
//!
//! # Running
//!
//! ```bash
//! cargo test -p dpvs-exporter --test e2e
//! ```

mod helpers;
mod scenarios;
