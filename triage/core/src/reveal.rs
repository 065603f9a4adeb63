//! Reveal Scheduler
//!
//! Turns `ScheduleReveal` effects into real delays. Each scheduled tick is
//! a spawned task that sleeps one interval and then sends the tick back on
//! a channel. Nothing is ever cancelled here; the draft controller's
//! generation check decides whether a tick that arrives still matters.
//!
//! Requires a running tokio runtime.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::draft::RevealTick;

/// Default delay between revealed characters
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(30);

/// Delivers reveal ticks after a fixed interval
#[derive(Debug)]
pub struct RevealScheduler {
    interval: Duration,
    tx: mpsc::UnboundedSender<RevealTick>,
    rx: mpsc::UnboundedReceiver<RevealTick>,
}

impl RevealScheduler {
    /// Scheduler with the given interval
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { interval, tx, rx }
    }

    /// Delay between ticks
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Deliver `tick` after one interval
    pub fn schedule(&self, tick: RevealTick) {
        let tx = self.tx.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            // The receiver only goes away when the scheduler is dropped
            let _ = tx.send(tick);
        });
    }

    /// Ticks that have already fired, oldest first
    pub fn try_recv_all(&mut self) -> Vec<RevealTick> {
        let mut ticks = Vec::new();
        while let Ok(tick) = self.rx.try_recv() {
            ticks.push(tick);
        }
        ticks
    }

    /// Wait for the next tick
    ///
    /// Never resolves to `None` while the scheduler is alive, since it
    /// holds a sender itself.
    pub async fn recv(&mut self) -> Option<RevealTick> {
        self.rx.recv().await
    }
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL)
    }
}
