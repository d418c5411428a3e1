//! Single-slot delayed task.
//!
//! Arming a new task aborts the one already waiting, so at most one action
//! is ever pending. Dropping the debouncer aborts it too.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::task::AbortOnDropHandle;

#[derive(Default)]
pub struct Debouncer {
    pending: Option<AbortOnDropHandle<()>>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `delay` has passed without another call to `arm`
    /// or `cancel`. Outside a tokio runtime nothing is scheduled and this
    /// returns false.
    pub fn arm<F>(&mut self, delay: Duration, action: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("Cannot schedule delayed task without a runtime: {}", e);
                return false;
            }
        };
        // Deadline is fixed now, not when the task is first polled
        let deadline = Instant::now() + delay;
        let handle = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            action.await;
        });
        self.pending = Some(AbortOnDropHandle::new(handle));
        true
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while an armed action has not yet completed
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}
