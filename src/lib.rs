pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod render;
pub mod theme;
pub mod trackers;
pub mod types;
pub mod ui;
pub mod views;
pub mod voice;
pub mod workout;
