//! Console relay - forwarding page console output to stdout

use std::time::Duration;

use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::HarnessResult;

/// Relays every console message the page emits to stdout, in emission order.
///
/// Attach before navigating so messages emitted during page load are not
/// missed. Call [`finish`](ConsoleRelay::finish) before printing the run
/// summary: it keeps the relay alive until the event stream has been quiet
/// for the drain window, so output still in flight over the CDP connection
/// lands ahead of the summary line.
pub struct ConsoleRelay {
    stop: oneshot::Sender<()>,
    task: JoinHandle<usize>,
}

impl ConsoleRelay {
    /// Subscribe to the page's console events and start relaying
    pub async fn attach(page: &Page, drain_window: Duration) -> HarnessResult<Self> {
        let mut events = page.event_listener::<EventConsoleApiCalled>().await?;
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut relayed = 0usize;
            loop {
                tokio::select! {
                    event = events.next() => match event {
                        Some(event) => {
                            println!("{}", render_event(&event));
                            relayed += 1;
                        }
                        None => break,
                    },
                    _ = &mut stopped => {
                        // Drain: keep relaying until the stream has been
                        // quiet for the full drain window.
                        loop {
                            match tokio::time::timeout(drain_window, events.next()).await {
                                Ok(Some(event)) => {
                                    println!("{}", render_event(&event));
                                    relayed += 1;
                                }
                                Ok(None) | Err(_) => break,
                            }
                        }
                        break;
                    }
                }
            }
            relayed
        });

        Ok(Self { stop, task })
    }

    /// Drain pending output and stop the relay. Returns how many messages
    /// were relayed over the whole run.
    pub async fn finish(self) -> usize {
        let _ = self.stop.send(());
        match self.task.await {
            Ok(relayed) => relayed,
            Err(e) => {
                debug!("Console relay task: {}", e);
                0
            }
        }
    }
}

/// Render one console event the way the page's author wrote it: arguments
/// joined with single spaces.
fn render_event(event: &EventConsoleApiCalled) -> String {
    event
        .args
        .iter()
        .map(|arg| render_value(arg.value.as_ref(), arg.description.as_deref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one console argument. Strings appear verbatim, other primitives
/// and structured values as JSON, and value-less remote objects fall back to
/// their protocol description.
fn render_value(value: Option<&serde_json::Value>, description: Option<&str>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
        None => description.unwrap_or_default().to_string(),
    }
}
