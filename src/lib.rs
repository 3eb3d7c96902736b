pub mod config;
pub mod constants;
pub mod error;
pub mod follower;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod types;

// Application layer and its infrastructure adapters
pub mod app;
pub mod infra;
