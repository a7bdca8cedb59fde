pub mod crawler;
pub mod notifier;
pub mod report;
pub mod scheduler;
pub mod scoring;
pub mod youtube_api;
