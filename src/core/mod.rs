pub mod classify;
pub mod config;
pub mod conversation;
pub mod render;
pub mod transcript;
