//! antdroid - legacy Ant-based Android build driver
//!
//! Thin orchestration over the Apache Ant Android toolchain: regenerates
//! the build descriptor and signing configuration, invokes `ant`, and
//! locates the produced package.

pub mod commands;

// Re-export crates
pub use antdroid_core as core;
pub use antdroid_engine as engine;
pub use antdroid_toolchain as toolchain;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
