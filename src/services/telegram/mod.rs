pub mod bot;
pub mod retry;
pub mod types;

pub use bot::*;
pub use retry::*;
pub use types::*;
