//! Project properties reader
//!
//! Parses `project.properties` for the three numbered key families the
//! driver cares about. One pass over the lines, each line checked
//! against a small table of family patterns.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::BuildError;

static LIBRARY_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*android\.library\.reference\.\d+=(.*?)\s*$").unwrap());
static GRADLE_INCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*cordova\.gradle\.include\.\d+=(.*?)\s*$").unwrap());
static SYSTEM_LIBRARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*cordova\.system\.library\.\d+=(.*?)\s*$").unwrap());

/// Properties derived from `project.properties`.
///
/// Recomputed from the file on every read; never cached across builds.
#[derive(Debug, Clone, Default)]
pub struct ProjectProperties {
    /// Referenced sub-project paths, relative to the project root
    pub libs: HashSet<String>,
    /// Gradle include directives (ignored by the Ant driver, surfaced
    /// for diagnostics)
    pub gradle_includes: HashSet<String>,
    /// Required system libraries; any entry makes the project
    /// unbuildable with Ant
    pub system_libs: HashSet<String>,
}

/// Read and parse a properties file.
///
/// A missing file is treated as an empty project everywhere in the
/// driver; any other read failure is fatal.
pub fn read(path: &Path) -> Result<ProjectProperties, BuildError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(ProjectProperties::default())
        }
        Err(err) => {
            return Err(BuildError::MalformedProperties {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    Ok(parse(&data))
}

fn parse(data: &str) -> ProjectProperties {
    let mut props = ProjectProperties::default();

    for line in data.lines() {
        if let Some(value) = capture(&LIBRARY_REFERENCE, line) {
            props.libs.insert(value);
        } else if let Some(value) = capture(&GRADLE_INCLUDE, line) {
            props.gradle_includes.insert(value);
        } else if let Some(value) = capture(&SYSTEM_LIBRARY, line) {
            props.system_libs.insert(value);
        }
    }

    props
}

fn capture(pattern: &Regex, line: &str) -> Option<String> {
    pattern.captures(line).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_all_families() {
        let data = "\
target=android-27
android.library.reference.1=CordovaLib
android.library.reference.2=libs/push-plugin
cordova.gradle.include.1=barcode/build.gradle
cordova.system.library.1=com.google.android.gms:play-services:+
";
        let props = parse(data);

        assert_eq!(props.libs.len(), 2);
        assert!(props.libs.contains("CordovaLib"));
        assert!(props.libs.contains("libs/push-plugin"));
        assert_eq!(props.gradle_includes.len(), 1);
        assert!(props
            .gradle_includes
            .contains("barcode/build.gradle"));
        assert_eq!(props.system_libs.len(), 1);
    }

    #[test]
    fn test_duplicate_values_deduplicated() {
        let data = "\
android.library.reference.1=CordovaLib
android.library.reference.2=CordovaLib
android.library.reference.3=other
";
        let props = parse(data);
        assert_eq!(props.libs.len(), 2);
    }

    #[test]
    fn test_leading_whitespace_and_trailing_space() {
        let data = "  android.library.reference.7=CordovaLib  \n";
        let props = parse(data);
        assert!(props.libs.contains("CordovaLib"));
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let data = "\
target=android-27
proguard.config=proguard.txt
android.library.reference=missing-number
";
        let props = parse(data);
        assert!(props.libs.is_empty());
        assert!(props.gradle_includes.is_empty());
        assert!(props.system_libs.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let props = read(&dir.path().join("project.properties")).unwrap();
        assert!(props.libs.is_empty());
        assert!(props.system_libs.is_empty());
    }

    #[test]
    fn test_empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.properties");
        std::fs::write(&path, "").unwrap();

        let props = read(&path).unwrap();
        assert!(props.libs.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        // A directory at the properties path is readable as a file entry
        // but not as text, which is a read failure, not a missing file.
        let path = dir.path().join("project.properties");
        std::fs::create_dir(&path).unwrap();

        match read(&path) {
            Err(BuildError::MalformedProperties { .. }) => {}
            other => panic!("expected MalformedProperties, got {:?}", other),
        }
    }
}
