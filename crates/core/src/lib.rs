//! Antdroid Core - shared types for the Ant build driver
//!
//! This crate provides the pieces every other antdroid crate leans on:
//! the application configuration, the event bus used for progress
//! reporting, and the top-level error type.

pub mod config;
pub mod error;
pub mod events;

pub use config::AppConfig;
pub use error::{AntdroidError, Result};
pub use events::{Event, EventBus, EventSubscription, LogLevel};

/// Antdroid version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "antdroid";
