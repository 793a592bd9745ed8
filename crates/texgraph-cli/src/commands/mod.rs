//! CLI command implementations.

pub mod common;
pub mod config;
pub mod kinds;
pub mod render;
