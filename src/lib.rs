//! scaffold-ai: pick a prompt template, generate code from it.

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod prompt;
pub mod report;
pub mod tui;
pub mod types;
