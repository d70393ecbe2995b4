//! Configuration management for the fusia client
//!
//! This module handles loading and managing configuration settings from
//! defaults, a TOML file and environment variable overrides.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
