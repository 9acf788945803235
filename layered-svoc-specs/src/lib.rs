#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Fixture-driven regression harness for layered-svoc.
//!
//! Each fixture is a TOML file holding a sentence, the clause records a
//! labeler returned for it, and what the repaired analysis must look like.
//!
//! ## Modules
//!
//! - [`fixture`] - Fixture format and parsing
//! - [`loader`] - Loading fixtures from disk
//! - [`runner`] - Running fixtures through the analyzer
//! - [`errors`] - Error types for the harness

pub mod errors;
pub mod fixture;
pub mod loader;
pub mod runner;

pub use errors::{SpecError, SpecResult};
pub use fixture::{parse_fixture, ClauseExpectation, SvocFixture};
pub use loader::{load_all_fixtures, load_fixture};
pub use runner::{assert_fixture, check_fixture, render_element, run_fixture, FixtureOutcome, Mismatch};
