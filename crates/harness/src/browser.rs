//! Browser lifecycle - launching headless Chrome and shutting it down

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};

/// Options for launching the browser
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run without a visible window
    pub headless: bool,

    /// Chrome/Chromium executable override (autodetected when None)
    pub executable: Option<PathBuf>,

    /// Window dimensions
    pub window_width: u32,
    pub window_height: u32,

    /// Timeout for individual DevTools Protocol requests
    pub request_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            window_width: 1280,
            window_height: 720,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle to a running browser process and its CDP event loop
pub struct BrowserHandle {
    browser: Browser,
    event_loop: JoinHandle<()>,
}

impl BrowserHandle {
    /// Launch the browser and start driving its CDP connection
    pub async fn launch(options: &BrowserOptions) -> HarnessResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(options.window_width, options.window_height)
            .request_timeout(options.request_timeout);

        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(HarnessError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| HarnessError::Launch(e.to_string()))?;

        debug!("Browser launched");

        // Drives all CDP traffic; ends when the browser connection closes.
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP event loop: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            event_loop,
        })
    }

    /// Open a blank page
    pub async fn new_page(&self) -> HarnessResult<Page> {
        Ok(self.browser.new_page("about:blank").await?)
    }

    /// Shut the browser down. Once an exit outcome has been decided a late
    /// shutdown error must not change it, so failures here are logged at
    /// debug level and otherwise swallowed.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("Browser close: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser wait: {}", e);
        }
    }
}

impl Drop for BrowserHandle {
    fn drop(&mut self) {
        // Early error paths skip close(); the Browser's own Drop reaps the
        // Chrome child process, this only stops the event loop task.
        self.event_loop.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_headless() {
        let options = BrowserOptions::default();

        assert!(options.headless);
        assert!(options.executable.is_none());
        assert_eq!(options.window_width, 1280);
        assert_eq!(options.window_height, 720);
        assert_eq!(options.request_timeout, Duration::from_secs(30));
    }
}
