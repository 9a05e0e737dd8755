pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod github;
pub mod model;
pub mod progress;
pub mod report;
pub mod stats;
