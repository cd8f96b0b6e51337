pub mod config;
pub mod modules;
pub mod services;

pub use config::{Config, ConfigError};
pub use services::monitor::{MonitorEngine, PollError, PollOutcome};
