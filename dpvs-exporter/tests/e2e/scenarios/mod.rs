//! E2E test scenarios.

mod rediscovery;
mod scrape_flow;
mod shutdown;
mod startup;
mod telemetry;
