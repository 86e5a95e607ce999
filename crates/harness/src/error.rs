//! Error types for the test driver

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Browser failed to launch: {0}")]
    Launch(String),

    #[error("Failed to open {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Page load timed out after {0:?}")]
    LoadTimeout(Duration),

    #[error("Test runner evaluation failed: {0}")]
    Evaluation(String),

    #[error("Failure count in {global:?} is not an integer: {value}")]
    FailureCount { global: String, value: String },

    #[error("Browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
