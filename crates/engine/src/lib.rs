//! Ant Build Engine
//!
//! Drives the legacy Apache Ant Android toolchain: materializes the build
//! descriptor and signing properties, reads `project.properties`, invokes
//! `ant`, and locates the produced APK.

pub mod artifact;
pub mod builder;
pub mod config;
pub mod generated;
pub mod properties;

pub use artifact::locate;
pub use builder::{AntBuilder, BuildOutput};
pub use config::{BuildMode, BuildOptions, BuildVariant, PackageInfo};
pub use properties::ProjectProperties;

use std::path::PathBuf;

use antdroid_toolchain::ToolchainError;

/// Build errors - every variant is fatal and propagated without retry
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
    #[error("project requires system libraries {0:?}; the Ant builder cannot model system-library dependencies, build with Gradle instead")]
    UnsupportedDependency(Vec<String>),
    #[error("failed to read properties file {path:?}: {source}")]
    MalformedProperties {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ant exited with status {code}")]
    ToolFailure { code: i32 },
    #[error("ant was terminated by a signal")]
    ToolTerminated,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
