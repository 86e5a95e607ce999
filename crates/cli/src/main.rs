//! pagetest CLI - Main Entry Point
//!
//! Opens a URL in a headless browser, invokes the page-embedded test
//! runner, relays the page's console output, and exits with a status code
//! reflecting the verdict: 0 when every test passed, 100 when the suite
//! reported failures, 1 when the harness itself failed (missing URL, page
//! would not load, runner could not be evaluated).

use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing::debug;

use pagetest_harness::{runner, BrowserOptions, RunConfig, EXIT_HARNESS_ERROR};

/// Headless browser driver for in-page unit test suites
#[derive(Parser, Debug)]
#[command(name = "pagetest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL of the page carrying the test suite
    url: Option<String>,

    /// JavaScript expression invoking the in-page test runner
    #[arg(long, default_value = "window.test_runner()")]
    runner_expr: String,

    /// Page-global holding the failure count
    #[arg(long, default_value = "test-failures")]
    failures_global: String,

    /// Page load timeout in seconds
    #[arg(long, default_value = "30")]
    load_timeout: u64,

    /// Console quiescence window before exit, in milliseconds
    #[arg(long, default_value = "250")]
    drain_window_ms: u64,

    /// Chrome/Chromium executable to use
    #[arg(long, env = "PAGETEST_CHROME")]
    chrome: Option<PathBuf>,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_run_config(self) -> Option<RunConfig> {
        let url = self.url?;

        Some(RunConfig {
            runner_expr: self.runner_expr,
            failures_global: self.failures_global,
            load_timeout: Duration::from_secs(self.load_timeout),
            drain_window: Duration::from_millis(self.drain_window_ms),
            browser: BrowserOptions {
                headless: !self.headed,
                executable: self.chrome,
                ..BrowserOptions::default()
            },
            ..RunConfig::new(url)
        })
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout is reserved for the driver protocol
    // (status lines plus relayed page console output).
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let Some(config) = cli.into_run_config() else {
        println!("Expected a target URL parameter.");
        println!("{}", Cli::command().render_usage());
        std::process::exit(EXIT_HARNESS_ERROR);
    };

    debug!("Run config: {:?}", config);

    match runner::execute(&config).await {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_HARNESS_ERROR);
        }
    }
}
