pub mod auth;
pub mod browse;
pub mod clear;
pub mod config;
pub mod context;
pub mod details;
pub mod edit;
pub mod filters;
pub mod interactions;
pub mod lookup;
pub mod play;
pub mod prompts;
pub mod stats;
pub mod ui;
