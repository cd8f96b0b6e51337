use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// Schedule that paces the poll loop
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next poll. `false` ends the loop.
    async fn tick(&mut self) -> bool;
}

/// Fixed-period ticker; the first tick completes immediately
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Ticker driven by an external channel; ends once every sender is dropped
pub struct ChannelTicker {
    rx: mpsc::Receiver<()>,
}

impl ChannelTicker {
    pub fn new(rx: mpsc::Receiver<()>) -> Self {
        Self { rx }
    }

    /// Ticker that fires exactly `n` times
    pub fn times(n: usize) -> Self {
        let (tx, rx) = mpsc::channel(n.max(1));
        for _ in 0..n {
            let _ = tx.try_send(());
        }
        Self { rx }
    }
}

#[async_trait]
impl Ticker for ChannelTicker {
    async fn tick(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}
