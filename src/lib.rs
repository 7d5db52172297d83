pub mod api;
pub mod browse;
pub mod config;
pub mod errors;
pub mod output;
pub mod session;
pub mod submission;
pub mod types;
pub mod view;
