use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one scheduled tick. Issued by the controller in increasing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickToken(pub u64);

/// A cancellable one-shot timer.
///
/// `schedule` arranges for `token` to be delivered back to the controller after `delay`.
/// `cancel` must suppress a not-yet-delivered token before it returns.
pub trait TickScheduler {
    /// Arrange delivery of `token` after `delay`.
    fn schedule(&mut self, token: TickToken, delay: Duration);
    /// Suppress delivery of `token` if it has not fired yet.
    fn cancel(&mut self, token: TickToken);
}

/// Virtual-clock scheduler. Nothing fires until the owner advances time.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    seq: u64,
    queue: Vec<ManualEntry>,
    cancelled: u64,
    last_cancelled: Option<TickToken>,
}

#[derive(Debug)]
struct ManualEntry {
    due: Duration,
    seq: u64,
    token: TickToken,
}

impl ManualScheduler {
    /// Scheduler at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of ticks waiting to fire.
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// How many ticks were cancelled before firing.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }

    /// The most recent tick cancelled before firing.
    pub fn last_cancelled(&self) -> Option<TickToken> {
        self.last_cancelled
    }

    /// Move the clock forward by `dt` and return the tokens that came due, in firing order.
    pub fn advance(&mut self, dt: Duration) -> Vec<TickToken> {
        self.now += dt;
        let now = self.now;
        let mut due: Vec<ManualEntry> = Vec::new();
        let mut i = 0;
        while i < self.queue.len() {
            if self.queue[i].due <= now {
                due.push(self.queue.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|e| (e.due, e.seq));
        due.into_iter().map(|e| e.token).collect()
    }

    /// Jump the clock to the earliest pending tick and return it.
    pub fn fire_next(&mut self) -> Option<TickToken> {
        let (idx, _) = self
            .queue
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| (e.due, e.seq))?;
        let entry = self.queue.swap_remove(idx);
        self.now = self.now.max(entry.due);
        Some(entry.token)
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, token: TickToken, delay: Duration) {
        self.seq += 1;
        self.queue.push(ManualEntry {
            due: self.now + delay,
            seq: self.seq,
            token,
        });
    }

    fn cancel(&mut self, token: TickToken) {
        let before = self.queue.len();
        self.queue.retain(|e| e.token != token);
        if self.queue.len() != before {
            self.cancelled += 1;
            self.last_cancelled = Some(token);
        }
    }
}

/// Real-time scheduler backed by tokio timers.
///
/// Each tick is a spawned task that sleeps and then sends its token on an unbounded channel;
/// cancelling aborts the task. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TickToken>,
    in_flight: Option<(TickToken, JoinHandle<()>)>,
}

impl TokioScheduler {
    /// Scheduler plus the receiving end its ticks are delivered on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                in_flight: None,
            },
            rx,
        )
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(&mut self, token: TickToken, delay: Duration) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(token);
        });
        if let Some((_, prev)) = self.in_flight.replace((token, handle)) {
            prev.abort();
        }
    }

    fn cancel(&mut self, token: TickToken) {
        match self.in_flight.take() {
            Some((pending, handle)) if pending == token => handle.abort(),
            other => self.in_flight = other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
