//! Repeating tick sources for the engine.
//!
//! The engine never sleeps or spawns anything itself. It asks a [`Ticker`]
//! to deliver ticks every period and gets back a [`TickId`]; every delivered
//! tick carries that id. Cancelling forgets the id on the engine side first,
//! so a tick that was already in flight when the engine stopped is
//! recognized as stale and dropped.
//!
//! [`TokioTicker`] is the runtime implementation: one `tokio` task per tick
//! source, feeding an unbounded channel that the watch loop selects on.
//! Tests drive the engine with a manual ticker instead.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickId(pub u64);

pub trait Ticker {
    /// Starts delivering ticks every `period`, first one after one period.
    fn schedule_every(&mut self, period: Duration) -> TickId;

    /// Stops the tick source. Cancelling an unknown id is a no-op.
    fn cancel(&mut self, id: TickId);
}

pub struct TokioTicker {
    sender: UnboundedSender<TickId>,
    next_id: u64,
    tasks: HashMap<TickId, JoinHandle<()>>,
}

impl TokioTicker {
    /// Creates the ticker and the receiving end of its tick channel.
    ///
    /// Must be used from within a tokio runtime.
    pub fn new() -> (Self, UnboundedReceiver<TickId>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let ticker = Self {
            sender,
            next_id: 0,
            tasks: HashMap::new(),
        };
        (ticker, receiver)
    }
}

impl Ticker for TokioTicker {
    fn schedule_every(&mut self, period: Duration) -> TickId {
        self.next_id += 1;
        let id = TickId(self.next_id);
        let sender = self.sender.clone();

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sender.send(id).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(id, task);
        tracing::debug!(tick = id.0, "tick source scheduled");
        id
    }

    fn cancel(&mut self, id: TickId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
            tracing::debug!(tick = id.0, "tick source cancelled");
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
