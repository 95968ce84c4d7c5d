//! Coalesces rapid query changes into a single delayed dispatch.
//!
//! Every raw value restarts the timer and replaces the pending value, so
//! only the newest value within an idle window is ever dispatched. An empty
//! string is a value like any other: downstream it means "leave search
//! mode", so it must flow through rather than be swallowed.

use std::time::Duration;
use tokio::sync::mpsc;

/// Idle window used when none is configured.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Timer-reset coalescing gate in front of query changes.
///
/// Feed raw keystrokes with [`on_query_changed`](Self::on_query_changed);
/// consume the surviving values with [`next`](Self::next) (awaiting) or
/// [`try_next`](Self::try_next) (polling, for tick-driven loops).
pub struct QueryDebouncer {
  input: mpsc::UnboundedSender<String>,
  output: mpsc::UnboundedReceiver<String>,
}

impl QueryDebouncer {
  /// Spawn the debounce task with the given idle window.
  ///
  /// Must be called from within a tokio runtime.
  pub fn new(delay: Duration) -> Self {
    let (input, mut raw) = mpsc::unbounded_channel::<String>();
    let (dispatch, output) = mpsc::unbounded_channel();

    tokio::spawn(async move {
      while let Some(mut pending) = raw.recv().await {
        loop {
          tokio::select! {
            next = raw.recv() => match next {
              // A newer value supersedes the pending one and restarts
              // the timer.
              Some(query) => pending = query,
              // Input closed: flush the pending value and stop.
              None => {
                let _ = dispatch.send(pending);
                return;
              }
            },
            _ = tokio::time::sleep(delay) => {
              let _ = dispatch.send(pending);
              break;
            }
          }
        }
      }
    });

    Self { input, output }
  }

  /// Enqueue a raw query change.
  pub fn on_query_changed(&self, query: impl Into<String>) {
    // Send only fails once the task has exited, which requires this
    // sender to already be dropped.
    let _ = self.input.send(query.into());
  }

  /// Await the next dispatched query. Returns `None` once the gate is
  /// closed and drained.
  pub async fn next(&mut self) -> Option<String> {
    self.output.recv().await
  }

  /// Poll for a dispatched query without blocking.
  pub fn try_next(&mut self) -> Option<String> {
    self.output.try_recv().ok()
  }
}

impl Default for QueryDebouncer {
  fn default() -> Self {
    Self::new(DEFAULT_DELAY)
  }
}
