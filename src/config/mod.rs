pub mod environment;
pub mod logging;

pub use environment::{log_file_from_env, Config, ConfigError};
pub use logging::init_tracing;
