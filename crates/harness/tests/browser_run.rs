//! Browser-backed driver tests
//!
//! These launch a real headless Chrome against file:// fixtures and are
//! ignored by default. Run with:
//! cargo test --package pagetest-harness -- --ignored

use std::time::Duration;

use pagetest_harness::{runner, HarnessError, RunConfig};

/// Write a fixture page whose inline script plays the in-page test runner.
fn fixture(dir: &tempfile::TempDir, script: &str) -> String {
    let path = dir.path().join("suite.html");
    let html = format!(
        "<!doctype html><html><head><script>{script}</script></head><body>suite</body></html>"
    );
    std::fs::write(&path, html).expect("write fixture page");
    format!("file://{}", path.display())
}

#[tokio::test]
#[ignore = "requires a Chrome installation"]
async fn passing_suite_exits_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = fixture(
        &dir,
        "window.test_runner = function () { \
           console.log('Ran 3 tests.'); \
           window['test-failures'] = 0; \
         };",
    );

    let outcome = runner::execute(&RunConfig::new(url)).await.expect("run");

    assert!(outcome.passed());
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
#[ignore = "requires a Chrome installation"]
async fn failing_suite_exits_one_hundred() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = fixture(
        &dir,
        "window.test_runner = function () { \
           console.log('FAIL in (example-test)'); \
           window['test-failures'] = 2; \
         };",
    );

    let outcome = runner::execute(&RunConfig::new(url)).await.expect("run");

    assert!(!outcome.passed());
    assert_eq!(outcome.failures, 2);
    assert_eq!(outcome.exit_code(), 100);
}

#[tokio::test]
#[ignore = "requires a Chrome installation"]
async fn custom_runner_and_global_are_honored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = fixture(
        &dir,
        "window.runAll = function () { window.failureCount = 0; };",
    );

    let config = RunConfig {
        runner_expr: "window.runAll()".to_string(),
        failures_global: "failureCount".to_string(),
        ..RunConfig::new(url)
    };

    let outcome = runner::execute(&config).await.expect("run");
    assert!(outcome.passed());
}

#[tokio::test]
#[ignore = "requires a Chrome installation"]
async fn missing_failure_count_is_a_harness_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = fixture(&dir, "window.test_runner = function () {};");

    let err = runner::execute(&RunConfig::new(url))
        .await
        .expect_err("global never set");

    assert!(matches!(
        err,
        HarnessError::Evaluation(_) | HarnessError::FailureCount { .. }
    ));
}

#[tokio::test]
#[ignore = "requires a Chrome installation"]
async fn unreachable_url_is_a_load_error() {
    // Nothing listens on port 1.
    let config = RunConfig {
        load_timeout: Duration::from_secs(10),
        ..RunConfig::new("http://127.0.0.1:1/tests.html")
    };

    let err = runner::execute(&config).await.expect_err("load must fail");

    assert!(matches!(
        err,
        HarnessError::Navigation { .. } | HarnessError::LoadTimeout(_)
    ));
}
