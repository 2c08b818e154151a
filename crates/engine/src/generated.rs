//! Generated file tracking
//!
//! Machine-written configuration files carry a marker header so a later
//! pass can tell them apart from user-authored files. All writes and
//! deletions of generated files go through these two operations, which
//! enforce the safety invariant: a file without the marker is never
//! deleted.

use std::io;
use std::path::Path;

use tracing::debug;

/// Marker identifying a machine-generated file
pub const MARKER: &str = "YOUR CHANGES WILL BE ERASED!";

/// Header written at the top of every generated file
pub const GENERATED_HEADER: &str =
    "# This file is automatically generated.\n# Do not modify this file -- YOUR CHANGES WILL BE ERASED!\n";

/// Write a generated file: marker header followed by `body`.
/// Overwrites whatever was there before.
pub fn write_generated(path: &Path, body: &str) -> io::Result<()> {
    let mut content = String::with_capacity(GENERATED_HEADER.len() + body.len());
    content.push_str(GENERATED_HEADER);
    content.push_str(body);
    std::fs::write(path, content)?;
    debug!("Wrote generated file {:?}", path);
    Ok(())
}

/// Check whether a file carries the generated marker.
/// A missing or unreadable file is not generated.
pub fn is_generated(path: &Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => content.contains(MARKER),
        Err(_) => false,
    }
}

/// Delete the file only if it carries the generated marker.
/// Returns whether a file was removed.
pub fn remove_if_generated(path: &Path) -> io::Result<bool> {
    if !is_generated(path) {
        return Ok(false);
    }
    std::fs::remove_file(path)?;
    debug!("Removed generated file {:?}", path);
    Ok(true)
}
