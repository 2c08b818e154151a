//! Artifact locator
//!
//! Finds the package file Ant produced for a variant. The scan is
//! non-recursive and deterministic: candidates are sorted by file name
//! and the first match wins. Absence is a normal `None`, the caller
//! decides whether that is fatal.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::BuildVariant;

/// Package file extension produced by the Ant toolchain
const PACKAGE_EXTENSION: &str = "apk";

/// Locate the package file for `variant` in `output_dir`.
///
/// Matches files with the package extension whose name contains the
/// variant token. A missing output directory yields `None`.
pub fn locate(output_dir: &Path, variant: BuildVariant) -> io::Result<Option<PathBuf>> {
    if !output_dir.is_dir() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let extension_matches = path
            .extension()
            .map(|ext| ext == PACKAGE_EXTENSION)
            .unwrap_or(false);
        if !extension_matches {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(variant.as_str()) {
            candidates.push(path);
        }
    }

    candidates.sort();
    Ok(candidates.into_iter().next())
}
