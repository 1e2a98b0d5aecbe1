//! Cancellable scheduled work for cosmetic delays
//!
//! Every mounted screen owns a scope: a cancellation token plus a generation
//! number. Work scheduled in a scope delivers its payload through a channel
//! once its delay elapses. Tearing the scope down cancels all outstanding
//! work and bumps the generation, so a payload that was already queued is
//! discarded on receipt instead of reaching the next screen.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// A payload tagged with the scope generation it was scheduled in
#[derive(Debug)]
struct Scheduled<T> {
    generation: u64,
    payload: T,
}

/// Scheduler owning the current cancellation scope
///
/// Must be used from within a tokio runtime since work is spawned as tasks.
#[derive(Debug)]
pub struct TaskScheduler<T> {
    tx: UnboundedSender<Scheduled<T>>,
    rx: UnboundedReceiver<Scheduled<T>>,
    scope: CancellationToken,
    generation: u64,
}

impl<T: Send + 'static> TaskScheduler<T> {
    /// Creates a scheduler with a fresh scope at generation 0
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            scope: CancellationToken::new(),
            generation: 0,
        }
    }

    /// Delivers `payload` once after `delay`, unless cancelled first
    ///
    /// # Arguments
    /// * `delay` - Time to wait before delivery
    /// * `payload` - Value handed back through `recv`
    pub fn schedule_after(&mut self, delay: Duration, payload: T) {
        let task_token = self.scope.child_token();
        let tx = self.tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    trace!(generation, "delayed task cancelled");
                }
                _ = time::sleep(delay) => {
                    // Receiver lives as long as the scheduler; a send error only
                    // means the scheduler itself is gone.
                    let _ = tx.send(Scheduled { generation, payload });
                }
            }
        });

        trace!(generation, delay_ms = delay.as_millis() as u64, "scheduled delayed task");
    }

    /// Delivers `count` payloads, one every `period`, the first after one period
    ///
    /// # Arguments
    /// * `period` - Interval between deliveries
    /// * `count` - Number of deliveries before the task finishes
    /// * `make_payload` - Builds the payload for the n-th tick (zero-based)
    pub fn schedule_every<F>(&mut self, period: Duration, count: usize, make_payload: F)
    where
        F: Fn(usize) -> T + Send + 'static,
    {
        let task_token = self.scope.child_token();
        let tx = self.tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            for tick in 0..count {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => {
                        trace!(generation, tick, "interval task cancelled");
                        return;
                    }
                    _ = ticker.tick() => {
                        if tx.send(Scheduled { generation, payload: make_payload(tick) }).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        trace!(generation, count, "scheduled interval task");
    }

    /// Cancels all work in the current scope and opens a new one
    ///
    /// # Returns
    /// The generation of the new scope
    pub fn teardown(&mut self) -> u64 {
        self.scope.cancel();
        self.scope = CancellationToken::new();
        self.generation += 1;
        trace!(generation = self.generation, "task scope torn down");
        self.generation
    }

    /// Waits for the next payload from the current scope
    ///
    /// Payloads from torn-down scopes are dropped. Cancel-safe.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            let scheduled = self.rx.recv().await?;
            if scheduled.generation == self.generation {
                return Some(scheduled.payload);
            }
            trace!(generation = scheduled.generation, "dropped stale payload");
        }
    }

    /// Returns an already delivered payload from the current scope, if any
    pub fn try_recv(&mut self) -> Option<T> {
        while let Ok(scheduled) = self.rx.try_recv() {
            if scheduled.generation == self.generation {
                return Some(scheduled.payload);
            }
        }
        None
    }
}

impl<T: Send + 'static> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for TaskScheduler<T> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
