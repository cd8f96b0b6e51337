pub mod engine;
pub mod ticker;

pub use engine::{LoopState, MonitorEngine, PollError, PollOutcome};
pub use ticker::{ChannelTicker, IntervalTicker, Ticker};
