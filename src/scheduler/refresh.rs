// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Self-replacing refresh timer.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

type FireFn = Arc<dyn Fn() + Send + Sync>;

/// Holds at most one pending one-shot timer.
///
/// Scheduling a new timer cancels the pending one, so the last call wins
/// even when it fires earlier than the one it replaces.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use labox_lib::scheduler::RefreshScheduler;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let scheduler = RefreshScheduler::new(|| println!("refresh"));
/// scheduler.schedule(Duration::from_secs(600));
/// assert!(scheduler.is_pending());
///
/// scheduler.cancel();
/// assert!(!scheduler.is_pending());
/// # }
/// ```
pub struct RefreshScheduler {
    pending: Mutex<Option<JoinHandle<()>>>,
    on_fire: FireFn,
}

impl RefreshScheduler {
    /// Creates a scheduler that calls `on_fire` when a timer expires.
    pub fn new<F>(on_fire: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            pending: Mutex::new(None),
            on_fire: Arc::new(on_fire),
        }
    }

    /// Arms a timer that fires after `delay`, replacing any pending one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, delay: Duration) {
        let on_fire = Arc::clone(&self.on_fire);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!("Refresh timer fired");
            on_fire();
        });

        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
        tracing::debug!(delay_secs = delay.as_secs(), "Refresh scheduled");
    }

    /// Cancels the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }

    /// Returns `true` if a timer is armed and has not fired yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
