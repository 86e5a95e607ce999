//! Test run orchestration - load the page, invoke the runner, read the verdict

use std::time::Duration;

use chromiumoxide::Page;
use tracing::debug;

use crate::browser::{BrowserHandle, BrowserOptions};
use crate::console::ConsoleRelay;
use crate::error::{HarnessError, HarnessResult};

/// Exit code when every test passed.
pub const EXIT_PASSED: i32 = 0;
/// Exit code for usage errors, load failures, and other harness failures.
pub const EXIT_HARNESS_ERROR: i32 = 1;
/// Exit code when the in-page suite reported failures.
pub const EXIT_TESTS_FAILED: i32 = 100;

/// Configuration for a single test run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// URL of the page carrying the test suite
    pub url: String,

    /// JavaScript expression invoking the in-page test runner
    pub runner_expr: String,

    /// Name of the page-global holding the failure count
    pub failures_global: String,

    /// Bound on page load; expiry is a load error, never retried
    pub load_timeout: Duration,

    /// Console quiescence window before the summary is printed
    pub drain_window: Duration,

    /// Browser launch options
    pub browser: BrowserOptions,
}

impl RunConfig {
    /// Configuration with the driver's default contract: the page exposes
    /// `window.test_runner()` and records its verdict in `test-failures`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            runner_expr: "window.test_runner()".to_string(),
            failures_global: "test-failures".to_string(),
            load_timeout: Duration::from_secs(30),
            drain_window: Duration::from_millis(250),
            browser: BrowserOptions::default(),
        }
    }

    /// The expression evaluated in the page: run the suite, then hand back
    /// the failure count. A single evaluation, so the count is read only
    /// after the runner's synchronous work completes.
    fn verdict_expr(&self) -> String {
        let global = serde_json::Value::String(self.failures_global.clone());
        format!(
            "(() => {{ {}; return window[{}]; }})()",
            self.runner_expr, global
        )
    }
}

/// Verdict of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of failing tests the page reported
    pub failures: i64,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.failures == 0
    }

    /// Process exit code for this verdict
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            EXIT_PASSED
        } else {
            EXIT_TESTS_FAILED
        }
    }
}

/// Run the suite at `config.url` and report the verdict.
///
/// Prints the driver's stdout protocol as a side effect: the `Loading URL:`
/// line, `Running test.`, every console message the page emits, and the
/// final summary line. Any returned error means the harness itself failed;
/// test failures are a [`RunOutcome`], not an error.
pub async fn execute(config: &RunConfig) -> HarnessResult<RunOutcome> {
    println!("Loading URL: {}", config.url);

    let browser = BrowserHandle::launch(&config.browser).await?;
    let page = browser.new_page().await?;

    // Subscribe before navigating so nothing emitted during load is lost.
    let relay = ConsoleRelay::attach(&page, config.drain_window).await?;

    if let Err(e) = load(&page, config).await {
        println!("Failed to open {}", config.url);
        relay.finish().await;
        browser.close().await;
        return Err(e);
    }

    println!("Running test.");

    let failures = match read_failures(&page, config).await {
        Ok(failures) => failures,
        Err(e) => {
            relay.finish().await;
            browser.close().await;
            return Err(e);
        }
    };

    // Everything the suite printed must land ahead of the summary line.
    let relayed = relay.finish().await;
    debug!("Relayed {} console message(s)", relayed);

    let outcome = RunOutcome { failures };
    if outcome.passed() {
        println!("Tests succeeded.");
    } else {
        println!("*** Tests failed! ***");
    }

    browser.close().await;
    Ok(outcome)
}

/// Navigate to the target URL, bounded by the load timeout
async fn load(page: &Page, config: &RunConfig) -> HarnessResult<()> {
    let navigation = async {
        page.goto(config.url.clone()).await?;
        page.wait_for_navigation().await?;
        Ok::<_, HarnessError>(())
    };

    match tokio::time::timeout(config.load_timeout, navigation).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(HarnessError::Cdp(e))) => Err(HarnessError::Navigation {
            url: config.url.clone(),
            reason: e.to_string(),
        }),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(HarnessError::LoadTimeout(config.load_timeout)),
    }
}

/// Invoke the in-page runner and read back the failure count
async fn read_failures(page: &Page, config: &RunConfig) -> HarnessResult<i64> {
    let expr = config.verdict_expr();
    debug!("Evaluating: {}", expr);

    let result = page
        .evaluate(expr)
        .await
        .map_err(|e| HarnessError::Evaluation(e.to_string()))?;

    let value: serde_json::Value = result
        .into_value()
        .map_err(|e| HarnessError::Evaluation(e.to_string()))?;

    value.as_i64().ok_or_else(|| HarnessError::FailureCount {
        global: config.failures_global.clone(),
        value: value.to_string(),
    })
}
