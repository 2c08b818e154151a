//! CLI commands for antdroid
//!
//! One struct per subcommand, executed by main after argument parsing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use antdroid_core::events::{Event, EventBus, EventSubscription, LogLevel};
use antdroid_engine::{AntBuilder, BuildOptions, BuildVariant, PackageInfo};

/// Build command options
pub struct BuildCommand {
    pub project_dir: PathBuf,
    pub project_name: String,
    pub release: bool,
    pub package_info: Option<PackageInfo>,
    pub extra_args: Vec<String>,
    pub verbose: bool,
}

impl BuildCommand {
    /// Execute the build command
    pub async fn execute(&self) -> Result<Option<PathBuf>> {
        info!("Building project: {:?}", self.project_dir);

        let variant = if self.release {
            BuildVariant::Release
        } else {
            BuildVariant::Debug
        };

        let options = BuildOptions {
            variant,
            package_info: self.package_info.clone(),
            extra_args: self.extra_args.clone(),
        };

        let events = Arc::new(EventBus::new());
        let printer = spawn_printer(events.subscribe(), self.verbose);

        let builder = AntBuilder::new(self.project_dir.clone(), self.project_name.clone())
            .with_events(Arc::clone(&events));
        let output = builder.build(&options).await;
        drop(builder);
        drop(events);
        let _ = printer.join();

        let output = output?;
        match &output.artifact {
            Some(path) => info!("Build successful: {:?}", path),
            None => info!("Build successful, but no package file was found"),
        }

        Ok(output.artifact)
    }
}

/// Clean command options
pub struct CleanCommand {
    pub project_dir: PathBuf,
    pub project_name: String,
    pub verbose: bool,
}

impl CleanCommand {
    /// Execute the clean command
    pub async fn execute(&self) -> Result<()> {
        info!("Cleaning project: {:?}", self.project_dir);

        let events = Arc::new(EventBus::new());
        let printer = spawn_printer(events.subscribe(), self.verbose);

        let builder = AntBuilder::new(self.project_dir.clone(), self.project_name.clone())
            .with_events(Arc::clone(&events));
        let result = builder.clean(&BuildOptions::debug()).await;
        drop(builder);
        drop(events);
        let _ = printer.join();

        result?;
        info!("Clean complete");
        Ok(())
    }
}

/// Toolchain status command
pub struct CheckCommand;

impl CheckCommand {
    /// Print the status of every prerequisite
    pub async fn execute(&self) -> Result<()> {
        println!("Ant build environment status:");
        println!("=============================");

        match antdroid_toolchain::check_ant().await {
            Ok(ant) => println!(
                "✓ Apache Ant: {:?} (version {})",
                ant.path,
                ant.version.as_deref().unwrap_or("unknown")
            ),
            Err(err) => println!("✗ Apache Ant: {}", err),
        }

        match antdroid_toolchain::sdk_root() {
            Ok(sdk) => {
                println!("✓ Android SDK: {:?}", sdk);
                match antdroid_toolchain::descriptor_template(&sdk) {
                    Ok(template) => println!("✓ Descriptor template: {:?}", template),
                    Err(err) => println!("✗ Descriptor template: {}", err),
                }
            }
            Err(err) => println!("✗ Android SDK: {}", err),
        }

        Ok(())
    }
}

/// Forward build events to the terminal on a dedicated thread.
/// The thread ends once every event sender is dropped.
fn spawn_printer(subscription: EventSubscription, verbose: bool) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for event in subscription.iter() {
            match event {
                Event::ToolOutput { line } => println!("{}", line),
                Event::Log { level, message } => {
                    if verbose || level != LogLevel::Verbose {
                        eprintln!("{}", message);
                    }
                }
                Event::BuildStarted { variant } => {
                    eprintln!("Building {} variant...", variant);
                }
                Event::BuildCompleted { success: false, .. } => {
                    eprintln!("Build failed");
                }
                _ => {}
            }
        }
    })
}
