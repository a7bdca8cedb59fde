pub mod config;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

pub use models::{VideoRecord, VideoStatistics};
