//! CLI command handlers

pub mod commands;

pub use commands::{fields, generate, paths, template};
