//! Ant builder
//!
//! Orchestrates a build or clean invocation: prerequisite checks, config
//! materialization, Ant invocation, artifact location. Steps run strictly
//! in sequence; the Ant process is the only long-running operation and is
//! awaited without timeout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use antdroid_core::events::{Event, EventBus};
use antdroid_toolchain as toolchain;

use crate::artifact;
use crate::config::{BuildMode, BuildOptions, BuildVariant};
use crate::generated;
use crate::properties;
use crate::BuildError;

/// Placeholder the SDK template carries for the project name
const PROJECT_NAME_PLACEHOLDER: &str = "PROJECT_NAME";

/// Build descriptor file name
const DESCRIPTOR_FILE: &str = "build.xml";

/// Local settings placeholder file name
const LOCAL_PROPERTIES_FILE: &str = "local.properties";

/// Project properties file name
const PROJECT_PROPERTIES_FILE: &str = "project.properties";

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Located package file, if Ant produced one where we expect it
    pub artifact: Option<PathBuf>,
    /// Build duration in seconds
    pub duration_secs: f64,
    /// Variant that was built
    pub variant: BuildVariant,
}

/// Drives Ant for one project
pub struct AntBuilder {
    project_dir: PathBuf,
    project_name: String,
    events: Arc<EventBus>,
}

impl AntBuilder {
    /// Create a builder for the project rooted at `project_dir`
    pub fn new(project_dir: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            project_dir: project_dir.into(),
            project_name: project_name.into(),
            events: Arc::new(EventBus::new()),
        }
    }

    /// Use a shared event bus instead of a private one
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// The event bus this builder reports on
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn descriptor_path(&self) -> PathBuf {
        self.project_dir.join(DESCRIPTOR_FILE)
    }

    fn signing_properties_path(&self, variant: BuildVariant) -> PathBuf {
        self.project_dir.join(variant.signing_properties_name())
    }

    /// Construct the Ant argument list for a target
    fn args(&self, target: &str, options: &BuildOptions, mode: BuildMode) -> Vec<String> {
        let mut args = vec![
            target.to_string(),
            "-f".to_string(),
            self.descriptor_path().display().to_string(),
        ];

        // Custom rules redirect output so incremental builds don't
        // collide with the SDK defaults.
        if mode == BuildMode::Incremental {
            args.push("-Dout.dir=ant-build".to_string());
            args.push("-Dgen.absolute.dir=ant-gen".to_string());
        }

        if options.package_info.is_some() {
            args.push(format!(
                "-propertyfile={}",
                self.signing_properties_path(options.variant).display()
            ));
        }

        args.extend(options.extra_args.iter().cloned());
        args
    }

    /// Prepare the build environment: verify prerequisites and
    /// regenerate every generated configuration file.
    ///
    /// The descriptor is copied in from the SDK on each build so the
    /// project never embeds a stale copy and always uses the installed
    /// SDK's latest template.
    pub async fn prep_env(&self, options: &BuildOptions) -> Result<(), BuildError> {
        toolchain::check_ant().await?;
        let sdk = toolchain::sdk_root()?;
        let template_path = toolchain::descriptor_template(&sdk)?;
        let template = tokio::fs::read_to_string(&template_path).await?;

        self.materialize(options, &template).await
    }

    /// Materialize generated configuration from the descriptor template.
    async fn materialize(&self, options: &BuildOptions, template: &str) -> Result<(), BuildError> {
        self.write_descriptor(&self.project_dir, template).await?;

        let props = properties::read(&self.project_dir.join(PROJECT_PROPERTIES_FILE))?;
        for lib in &props.libs {
            self.write_descriptor(&self.project_dir.join(lib), template)
                .await?;
        }

        if !props.system_libs.is_empty() {
            let mut libs: Vec<String> = props.system_libs.iter().cloned().collect();
            libs.sort();
            return Err(BuildError::UnsupportedDependency(libs));
        }

        self.materialize_signing(options)
    }

    /// Write or clear the generated signing properties for the variant
    fn materialize_signing(&self, options: &BuildOptions) -> Result<(), BuildError> {
        let path = self.signing_properties_path(options.variant);
        if let Some(ref info) = options.package_info {
            generated::write_generated(&path, &info.to_properties())?;
            self.events.emit(Event::FileGenerated(path));
        } else {
            generated::remove_if_generated(&path)?;
        }
        Ok(())
    }

    /// Render the template and write the descriptor into `dir`, plus a
    /// placeholder local settings file if the user has none.
    async fn write_descriptor(&self, dir: &Path, template: &str) -> Result<(), BuildError> {
        // Single literal substitution of the project name.
        let rendered = template.replacen(PROJECT_NAME_PLACEHOLDER, &self.project_name, 1);
        let descriptor = dir.join(DESCRIPTOR_FILE);
        tokio::fs::write(&descriptor, rendered).await?;
        debug!("Wrote build descriptor {:?}", descriptor);

        let local = dir.join(LOCAL_PROPERTIES_FILE);
        if !local.exists() {
            generated::write_generated(&local, "")?;
        }

        Ok(())
    }

    /// Build the project with Ant.
    ///
    /// In full mode a clean runs first; Ant cannot build incrementally
    /// without custom rules. The generated signing properties are
    /// re-materialized after that clean removes them.
    pub async fn build(&self, options: &BuildOptions) -> Result<BuildOutput, BuildError> {
        let start = Instant::now();
        let mode = BuildMode::detect(&self.project_dir);

        self.prep_env(options).await?;

        if mode == BuildMode::Full {
            self.clean_with_mode(options, mode).await?;
            self.materialize_signing(options)?;
        }

        self.events.emit(Event::BuildStarted {
            variant: options.variant.as_str().to_string(),
        });

        let args = self.args(options.variant.ant_target(), options, mode);
        if let Err(err) = self.run_ant(&args).await {
            self.events.emit(Event::BuildCompleted {
                success: false,
                artifact: None,
            });
            return Err(err);
        }

        let out_dir = mode.output_dir(&self.project_dir);
        let artifact = artifact::locate(&out_dir, options.variant)?;

        self.events.emit(Event::BuildCompleted {
            success: true,
            artifact: artifact.clone(),
        });

        let duration_secs = start.elapsed().as_secs_f64();
        info!("Build completed in {:.2}s", duration_secs);

        Ok(BuildOutput {
            artifact,
            duration_secs,
            variant: options.variant,
        })
    }

    /// Clean the project: run the Ant clean target, delete the output
    /// directory, and remove generated signing properties for both
    /// variants.
    pub async fn clean(&self, options: &BuildOptions) -> Result<(), BuildError> {
        let mode = BuildMode::detect(&self.project_dir);
        self.clean_with_mode(options, mode).await
    }

    async fn clean_with_mode(
        &self,
        options: &BuildOptions,
        mode: BuildMode,
    ) -> Result<(), BuildError> {
        toolchain::check_ant().await?;

        let args = self.args("clean", options, mode);
        self.run_ant(&args).await?;

        let out_dir = mode.output_dir(&self.project_dir);
        if out_dir.exists() {
            tokio::fs::remove_dir_all(&out_dir).await?;
        }

        for variant in [BuildVariant::Debug, BuildVariant::Release] {
            generated::remove_if_generated(&self.signing_properties_path(variant))?;
        }

        self.events.emit(Event::CleanCompleted);
        Ok(())
    }

    /// Spawn Ant, stream its output, and surface the exit status.
    async fn run_ant(&self, args: &[String]) -> Result<(), BuildError> {
        self.events
            .verbose(format!("Executing: ant {}", args.join(" ")));
        debug!("Running: ant {:?}", args);

        let mut child = Command::new("ant")
            .current_dir(&self.project_dir)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(stdout) = child.stdout.take() {
            let events = Arc::clone(&self.events);
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    events.emit(Event::ToolOutput { line });
                }
            });
        }

        if let Some(stderr) = child.stderr.take() {
            let events = Arc::clone(&self.events);
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!("{}", line);
                    events.emit(Event::ToolOutput { line });
                }
            });
        }

        let status = child.wait().await?;
        if !status.success() {
            return match status.code() {
                Some(code) => Err(BuildError::ToolFailure { code }),
                None => Err(BuildError::ToolTerminated),
            };
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackageInfo;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<project name=\"PROJECT_NAME\" default=\"help\"></project>";

    fn builder(dir: &TempDir) -> AntBuilder {
        AntBuilder::new(dir.path(), "HelloApp")
    }

    fn release_with_credentials() -> BuildOptions {
        BuildOptions::release().with_package_info(PackageInfo::new(
            PathBuf::from("/keys/app.keystore"),
            "upload",
            "storepass",
            "keypass",
        ))
    }

    #[tokio::test]
    async fn test_materialize_writes_descriptor() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);

        b.materialize(&BuildOptions::debug(), TEMPLATE).await.unwrap();

        let descriptor = std::fs::read_to_string(dir.path().join("build.xml")).unwrap();
        assert!(descriptor.contains("name=\"HelloApp\""));
        assert!(!descriptor.contains(PROJECT_NAME_PLACEHOLDER));
        assert!(dir.path().join("local.properties").exists());
    }

    #[tokio::test]
    async fn test_materialize_overwrites_descriptor() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);
        std::fs::write(dir.path().join("build.xml"), "stale").unwrap();

        b.materialize(&BuildOptions::debug(), TEMPLATE).await.unwrap();

        let descriptor = std::fs::read_to_string(dir.path().join("build.xml")).unwrap();
        assert!(!descriptor.contains("stale"));
    }

    #[tokio::test]
    async fn test_materialize_preserves_local_properties() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);
        std::fs::write(dir.path().join("local.properties"), "sdk.dir=/opt/sdk\n").unwrap();

        b.materialize(&BuildOptions::debug(), TEMPLATE).await.unwrap();

        let local = std::fs::read_to_string(dir.path().join("local.properties")).unwrap();
        assert_eq!(local, "sdk.dir=/opt/sdk\n");
    }

    #[tokio::test]
    async fn test_materialize_covers_sub_projects() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);
        std::fs::create_dir(dir.path().join("CordovaLib")).unwrap();
        std::fs::write(
            dir.path().join("project.properties"),
            "android.library.reference.1=CordovaLib\n",
        )
        .unwrap();

        b.materialize(&BuildOptions::debug(), TEMPLATE).await.unwrap();

        assert!(dir.path().join("CordovaLib").join("build.xml").exists());
        assert!(dir
            .path()
            .join("CordovaLib")
            .join("local.properties")
            .exists());
    }

    #[tokio::test]
    async fn test_system_libraries_are_unsupported() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);
        std::fs::write(
            dir.path().join("project.properties"),
            "cordova.system.library.1=com.google.android.gms:play-services:+\n",
        )
        .unwrap();

        match b.materialize(&BuildOptions::debug(), TEMPLATE).await {
            Err(BuildError::UnsupportedDependency(libs)) => {
                assert_eq!(libs, vec!["com.google.android.gms:play-services:+"]);
            }
            other => panic!("expected UnsupportedDependency, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signing_properties_written_with_marker() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);

        b.materialize(&release_with_credentials(), TEMPLATE)
            .await
            .unwrap();

        let path = dir.path().join("release-signing.properties");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# This file is automatically generated."));
        assert!(content.contains("key.alias=upload"));
    }

    #[tokio::test]
    async fn test_signing_properties_overwritten_with_new_credentials() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);

        b.materialize(&release_with_credentials(), TEMPLATE)
            .await
            .unwrap();

        let other = BuildOptions::release().with_package_info(PackageInfo::new(
            PathBuf::from("/keys/other.keystore"),
            "second",
            "p1",
            "p2",
        ));
        b.materialize(&other, TEMPLATE).await.unwrap();

        let content =
            std::fs::read_to_string(dir.path().join("release-signing.properties")).unwrap();
        assert!(content.contains("key.alias=second"));
        assert!(!content.contains("key.alias=upload"));
    }

    #[tokio::test]
    async fn test_stale_generated_signing_properties_removed() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);

        b.materialize(&release_with_credentials(), TEMPLATE)
            .await
            .unwrap();
        b.materialize(&BuildOptions::release(), TEMPLATE)
            .await
            .unwrap();

        assert!(!dir.path().join("release-signing.properties").exists());
    }

    #[tokio::test]
    async fn test_user_signing_properties_untouched() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);
        let path = dir.path().join("release-signing.properties");
        std::fs::write(&path, "key.store=hand-written\n").unwrap();

        b.materialize(&BuildOptions::release(), TEMPLATE)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "key.store=hand-written\n");
    }

    #[test]
    fn test_args_debug_full() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);

        let args = b.args("debug", &BuildOptions::debug(), BuildMode::Full);
        assert_eq!(args[0], "debug");
        assert_eq!(args[1], "-f");
        assert!(args[2].ends_with("build.xml"));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_args_incremental_adds_overrides() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);

        let args = b.args("release", &BuildOptions::release(), BuildMode::Incremental);
        assert!(args.contains(&"-Dout.dir=ant-build".to_string()));
        assert!(args.contains(&"-Dgen.absolute.dir=ant-gen".to_string()));
    }

    #[test]
    fn test_args_with_signing_reference_propertyfile() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);

        let args = b.args("release", &release_with_credentials(), BuildMode::Full);
        let propertyfile = args
            .iter()
            .find(|a| a.starts_with("-propertyfile="))
            .expect("propertyfile argument");
        assert!(propertyfile.ends_with("release-signing.properties"));
    }

    #[test]
    fn test_args_extra_args_appended() {
        let dir = TempDir::new().unwrap();
        let b = builder(&dir);
        let options = BuildOptions::debug().with_extra_args(vec!["-quiet".to_string()]);

        let args = b.args("debug", &options, BuildMode::Full);
        assert_eq!(args.last().unwrap(), "-quiet");
    }

    #[test]
    fn test_locator_follows_build_mode() {
        let dir = TempDir::new().unwrap();
        let full_out = dir.path().join("bin");
        let incremental_out = dir.path().join("ant-build");
        std::fs::create_dir(&full_out).unwrap();
        std::fs::create_dir(&incremental_out).unwrap();
        std::fs::write(full_out.join("app-debug.apk"), b"").unwrap();
        std::fs::write(incremental_out.join("app-debug.apk"), b"").unwrap();

        let mode = BuildMode::detect(dir.path());
        let found = artifact::locate(&mode.output_dir(dir.path()), BuildVariant::Debug)
            .unwrap()
            .unwrap();
        assert!(found.starts_with(&full_out));

        std::fs::write(dir.path().join("custom_rules.xml"), "<project/>").unwrap();
        let mode = BuildMode::detect(dir.path());
        let found = artifact::locate(&mode.output_dir(dir.path()), BuildVariant::Debug)
            .unwrap()
            .unwrap();
        assert!(found.starts_with(&incremental_out));
    }
}
