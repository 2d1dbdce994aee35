pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod types;
