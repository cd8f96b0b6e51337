pub mod monitor;
pub mod practicum;
pub mod telegram;
