//! Command Central Authorization Testing Infrastructure
//!
//! Shared fixtures for the authorization integration tests: deterministic
//! person ids, a small org chart, the scenario roles used across test files,
//! and proptest strategies for roles and org charts.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! cc-testkit = { path = "../cc-testkit" }
//! ```
//!
//! ```rust,no_run
//! use cc_testkit::*;
//!
//! let org = OrgChartFixture::new();
//! let chief = division_chief();
//! ```

pub mod fixtures;
pub mod strategies;

pub use fixtures::*;

/// Install a test-friendly tracing subscriber, honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
