//! Console Client
//!
//! Thin wrapper around the Console for TUI integration. It embeds the
//! Console directly together with the reveal scheduler, so the App only
//! deals in events going in and effects coming out.
//!
//! # Architecture
//!
//! The TUI doesn't contain any triage logic. Its job is:
//! 1. Convert terminal events to ConsoleEvents
//! 2. Send ConsoleEvents to the Console through this client
//! 3. Collect the ConsoleEffects meant for the surface
//! 4. Render from Console snapshots
//!
//! `ScheduleReveal` effects never reach the App: the client hands them to
//! the scheduler and feeds the fired ticks back into the Console.

use std::time::Duration;

use triage_core::{Console, ConsoleEffect, ConsoleEvent, ConsoleSnapshot, RevealScheduler, RevealTick};

/// Client for the embedded Console
pub struct ConsoleClient {
    /// The embedded Console instance
    console: Console,
    /// Timer for reveal ticks
    scheduler: RevealScheduler,
    /// Effects waiting for the App
    pending: Vec<ConsoleEffect>,
}

impl ConsoleClient {
    /// Wrap a console, revealing one character every `reveal_interval`
    pub fn new(console: Console, reveal_interval: Duration) -> Self {
        Self {
            console,
            scheduler: RevealScheduler::new(reveal_interval),
            pending: Vec::new(),
        }
    }

    /// Send an event to the Console
    ///
    /// Must be called from within a tokio runtime: reveal ticks are
    /// scheduled as tasks.
    pub fn send(&mut self, event: ConsoleEvent) {
        for effect in self.console.handle_event(event) {
            match effect {
                ConsoleEffect::ScheduleReveal(tick) => self.scheduler.schedule(tick),
                other => {
                    tracing::debug!(effect = ?other, "Effect queued for surface");
                    self.pending.push(other);
                }
            }
        }
    }

    /// Feed a fired reveal tick back to the Console
    pub fn deliver_tick(&mut self, tick: RevealTick) {
        self.send(ConsoleEvent::RevealTick(tick));
    }

    /// Deliver every tick that has already fired (non-blocking)
    pub fn poll_reveals(&mut self) -> usize {
        let ticks = self.scheduler.try_recv_all();
        let count = ticks.len();
        for tick in ticks {
            self.deliver_tick(tick);
        }
        count
    }

    /// Wait for the next reveal tick to fire
    pub async fn next_tick(&mut self) -> Option<RevealTick> {
        self.scheduler.recv().await
    }

    /// Take all effects meant for the surface (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConsoleEffect> {
        std::mem::take(&mut self.pending)
    }

    /// The embedded Console
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Snapshot for rendering
    pub fn snapshot(&self) -> ConsoleSnapshot {
        self.console.snapshot()
    }

    /// Delay between revealed characters
    pub fn reveal_interval(&self) -> Duration {
        self.scheduler.interval()
    }
}
