//! Configuration module for Pocket
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::PocketPaths;
pub use settings::{ImportMode, ReminderSettings, Settings, SpendScope};
