//! pagetest driver library
//!
//! Drives an in-page unit test suite from the command line:
//! - Launches headless Chrome over the DevTools Protocol
//! - Relays the page's console output to stdout in emission order
//! - Invokes the page-embedded test runner and reads back its failure count
//!
//! The test runner itself is an external collaborator: the loaded page is
//! expected to expose an entry point (default `window.test_runner()`) and to
//! record the number of failing tests in a page-global (default
//! `test-failures`). A run ends in one of three ways: every test passed
//! (exit 0), the suite reported failures (exit 100), or the harness itself
//! failed — bad arguments, a page that would not load, a runner that could
//! not be evaluated (exit 1).

pub mod browser;
pub mod console;
pub mod error;
pub mod runner;

pub use browser::{BrowserHandle, BrowserOptions};
pub use console::ConsoleRelay;
pub use error::{HarnessError, HarnessResult};
pub use runner::{
    execute, RunConfig, RunOutcome, EXIT_HARNESS_ERROR, EXIT_PASSED, EXIT_TESTS_FAILED,
};
