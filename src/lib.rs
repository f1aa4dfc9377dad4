pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod poller;
pub mod recorder;
pub mod ticker;
pub mod types;
