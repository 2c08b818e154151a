//! Prerequisite checks
//!
//! Each check is cheap and re-run on every build invocation; nothing here
//! is cached, so a toolchain installed between two builds is picked up.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::ToolchainError;

/// Location of the descriptor template inside the SDK
const TEMPLATE_RELATIVE: &[&str] = &["tools", "lib", "build.template"];

/// Detected Ant installation
#[derive(Debug, Clone)]
pub struct AntInfo {
    /// Path to the `ant` executable
    pub path: PathBuf,
    /// Version string reported by `ant -version`, if parseable
    pub version: Option<String>,
}

/// Verify that Apache Ant is installed and runnable.
///
/// Resolves `ant` on the PATH and probes it with `-version`; a binary
/// that cannot be executed counts as missing.
pub async fn check_ant() -> Result<AntInfo, ToolchainError> {
    let path = which::which("ant").map_err(|_| ToolchainError::AntMissing)?;

    let output = Command::new(&path)
        .arg("-version")
        .output()
        .await
        .map_err(|_| ToolchainError::AntMissing)?;

    if !output.status.success() {
        return Err(ToolchainError::AntMissing);
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let version = parse_ant_version(&text);
    debug!("Found Apache Ant at {:?} (version {:?})", path, version);

    Ok(AntInfo { path, version })
}

/// Resolve the Android SDK root from the environment.
///
/// `ANDROID_HOME` wins over `ANDROID_SDK_ROOT`; the directory must exist.
pub fn sdk_root() -> Result<PathBuf, ToolchainError> {
    let root = std::env::var("ANDROID_HOME")
        .or_else(|_| std::env::var("ANDROID_SDK_ROOT"))
        .map(PathBuf::from)
        .map_err(|_| ToolchainError::SdkMissing)?;

    if !root.is_dir() {
        return Err(ToolchainError::SdkMissing);
    }

    Ok(root)
}

/// Locate the SDK's build descriptor template (`tools/lib/build.template`).
pub fn descriptor_template(sdk_root: &Path) -> Result<PathBuf, ToolchainError> {
    let mut path = sdk_root.to_path_buf();
    for part in TEMPLATE_RELATIVE {
        path.push(part);
    }

    if !path.is_file() {
        return Err(ToolchainError::TemplateMissing(path));
    }

    Ok(path)
}

/// Pull the version number out of `ant -version` output.
///
/// Typical line: `Apache Ant(TM) version 1.10.14 compiled on August 16 2023`
fn parse_ant_version(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(rest) = line.split("version ").nth(1) {
            let version = rest.split_whitespace().next()?;
            return Some(version.to_string());
        }
    }
    None
}
