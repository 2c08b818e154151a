//! Build Configuration
//!
//! Build options, variants, and the build mode derived from the project's
//! custom rules file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File whose presence in the project root enables incremental builds
pub const CUSTOM_RULES_FILE: &str = "custom_rules.xml";

/// Suffix of the per-variant generated signing properties file
pub const SIGNING_PROPERTIES_SUFFIX: &str = "-signing.properties";

/// Build variant (debug/release)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildVariant {
    #[default]
    Debug,
    Release,
}

impl BuildVariant {
    /// Variant token, also the substring identifying the variant in
    /// artifact file names
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    /// Ant target that assembles this variant
    pub fn ant_target(&self) -> &'static str {
        self.as_str()
    }

    /// File name of the generated signing properties for this variant
    pub fn signing_properties_name(&self) -> String {
        format!("{}{}", self.as_str(), SIGNING_PROPERTIES_SUFFIX)
    }
}

/// Build mode, decided by the presence of the custom rules file.
///
/// Detected once per invocation and threaded through as a value; the
/// file can appear or disappear between invocations, so the result is
/// never cached across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// No custom rules: every build starts from a clean slate
    Full,
    /// Custom rules present: incremental builds, redirected output
    Incremental,
}

impl BuildMode {
    /// Probe the project root for the custom rules file
    pub fn detect(project_dir: &Path) -> Self {
        if project_dir.join(CUSTOM_RULES_FILE).exists() {
            BuildMode::Incremental
        } else {
            BuildMode::Full
        }
    }

    /// Directory Ant writes package files into under this mode
    pub fn output_dir(&self, project_dir: &Path) -> PathBuf {
        match self {
            BuildMode::Full => project_dir.join("bin"),
            BuildMode::Incremental => project_dir.join("ant-build"),
        }
    }
}

/// Options for a single build or clean invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Build variant
    pub variant: BuildVariant,

    /// Signing credentials; release builds without these produce an
    /// unsigned package
    pub package_info: Option<PackageInfo>,

    /// Extra arguments appended to the Ant command line
    pub extra_args: Vec<String>,
}

impl BuildOptions {
    /// Options for a debug build
    pub fn debug() -> Self {
        Self {
            variant: BuildVariant::Debug,
            ..Default::default()
        }
    }

    /// Options for a release build
    pub fn release() -> Self {
        Self {
            variant: BuildVariant::Release,
            ..Default::default()
        }
    }

    /// Attach signing credentials
    pub fn with_package_info(mut self, info: PackageInfo) -> Self {
        self.package_info = Some(info);
        self
    }

    /// Append extra Ant arguments
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

/// Packaging/signing credentials for a build variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Path to the keystore file
    pub keystore: PathBuf,
    /// Key alias
    pub alias: String,
    /// Keystore password
    pub store_password: String,
    /// Key password
    pub key_password: String,
    /// Keystore type (JKS, PKCS12); Ant picks a default when omitted
    pub store_type: Option<String>,
}

impl PackageInfo {
    /// Create a new credentials set
    pub fn new(
        keystore: PathBuf,
        alias: &str,
        store_password: &str,
        key_password: &str,
    ) -> Self {
        Self {
            keystore,
            alias: alias.to_string(),
            store_password: store_password.to_string(),
            key_password: key_password.to_string(),
            store_type: None,
        }
    }

    /// Set the keystore type
    pub fn with_store_type(mut self, store_type: &str) -> Self {
        self.store_type = Some(store_type.to_string());
        self
    }

    /// Serialize to Java properties format, the way the Ant signing
    /// tasks expect them. Backslashes are escaped for Windows paths.
    pub fn to_properties(&self) -> String {
        fn line(out: &mut String, key: &str, value: &str) {
            out.push_str(key);
            out.push('=');
            out.push_str(&value.replace('\\', "\\\\"));
            out.push('\n');
        }

        let mut out = String::new();
        line(&mut out, "key.store", &self.keystore.to_string_lossy());
        line(&mut out, "key.alias", &self.alias);
        line(&mut out, "key.store.password", &self.store_password);
        line(&mut out, "key.alias.password", &self.key_password);
        if let Some(ref store_type) = self.store_type {
            line(&mut out, "key.store.type", store_type);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_variant_tokens() {
        assert_eq!(BuildVariant::Debug.as_str(), "debug");
        assert_eq!(BuildVariant::Release.ant_target(), "release");
        assert_eq!(
            BuildVariant::Release.signing_properties_name(),
            "release-signing.properties"
        );
    }

    #[test]
    fn test_build_mode_detect() {
        let dir = TempDir::new().unwrap();
        assert_eq!(BuildMode::detect(dir.path()), BuildMode::Full);

        std::fs::write(dir.path().join(CUSTOM_RULES_FILE), "<project/>").unwrap();
        assert_eq!(BuildMode::detect(dir.path()), BuildMode::Incremental);

        std::fs::remove_file(dir.path().join(CUSTOM_RULES_FILE)).unwrap();
        assert_eq!(BuildMode::detect(dir.path()), BuildMode::Full);
    }

    #[test]
    fn test_output_dir_per_mode() {
        let root = Path::new("/project");
        assert_eq!(BuildMode::Full.output_dir(root), root.join("bin"));
        assert_eq!(
            BuildMode::Incremental.output_dir(root),
            root.join("ant-build")
        );
    }

    #[test]
    fn test_package_info_to_properties() {
        let info = PackageInfo::new(
            PathBuf::from("/keys/release.keystore"),
            "upload",
            "storepass",
            "keypass",
        )
        .with_store_type("PKCS12");

        let props = info.to_properties();
        assert_eq!(
            props,
            "key.store=/keys/release.keystore\n\
             key.alias=upload\n\
             key.store.password=storepass\n\
             key.alias.password=keypass\n\
             key.store.type=PKCS12\n"
        );
    }

    #[test]
    fn test_package_info_escapes_backslashes() {
        let info = PackageInfo::new(
            PathBuf::from("C:\\keys\\release.keystore"),
            "upload",
            "pass",
            "pass",
        );

        let props = info.to_properties();
        assert!(props.contains("key.store=C:\\\\keys\\\\release.keystore"));
    }

    #[test]
    fn test_package_info_without_store_type() {
        let info = PackageInfo::new(PathBuf::from("ks"), "a", "p1", "p2");
        assert!(!info.to_properties().contains("key.store.type"));
    }
}
