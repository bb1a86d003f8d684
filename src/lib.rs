pub mod api;
pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod global;
pub mod permission;
pub mod session;
pub mod ui;
