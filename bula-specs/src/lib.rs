//! Fixture-driven regression harness for bula-sections.
//!
//! Test cases are `.toml` files holding a reference and a target leaflet
//! (headings marked with `# `) and a list of expectations about their audit.
//!
//! ## Modules
//!
//! - [`fixture`] - fixture and expectation types
//! - [`loader`] - fixture file loading, single or by directory
//! - [`config`] - audit presets a fixture can select
//! - [`runner`] - runs fixtures and checks expectations
//! - [`failures`] - expected failures tracking via TOML
//! - [`formatter`] - failure and summary output
//! - [`errors`] - error types for the harness

pub mod config;
pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod runner;

pub use config::FixturePreset;
pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{BulaFixture, Expectation, FixtureDocument, BODY_FONT_SIZE, HEADING_FONT_SIZE};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture, parse_fixture};
pub use runner::{
    check_expectation, check_fixture_expectations, run_fixture, run_harness, ExpectationOutcome,
    ExpectationResult, HarnessRun,
};

#[cfg(test)]
mod tests;
