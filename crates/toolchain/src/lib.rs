//! Toolchain prerequisite checks
//!
//! Verifies the external pieces the Ant build driver depends on:
//! - Apache Ant on the PATH
//! - Android SDK location (`ANDROID_HOME` / `ANDROID_SDK_ROOT`)
//! - the SDK-provided build descriptor template

pub mod checks;

pub use checks::{check_ant, descriptor_template, sdk_root, AntInfo};

use std::path::PathBuf;

/// Toolchain errors - all fatal, surfaced to the caller without retry
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    #[error("Apache Ant not found; make sure `ant` is installed and on your PATH")]
    AntMissing,
    #[error("Android SDK not found; set ANDROID_HOME or ANDROID_SDK_ROOT")]
    SdkMissing,
    #[error("build descriptor template not found at {0:?}; the installed SDK does not ship Ant build support")]
    TemplateMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
