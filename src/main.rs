//! antdroid - legacy Ant-based Android build driver
//!
//! Command-line entry point: parses arguments, loads the application
//! configuration, and dispatches to the build/clean/check commands.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use antdroid::commands::{BuildCommand, CheckCommand, CleanCommand};
use antdroid::core::config::{config_dir, AppConfig};
use antdroid::engine::PackageInfo;

#[derive(Parser, Debug)]
#[command(name = "antdroid", version, about = "Legacy Ant-based Android build driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the application package with Ant
    Build {
        #[arg(long, help = "Project root (defaults to the configured or current directory)")]
        project_dir: Option<PathBuf>,
        #[arg(long, help = "Project name substituted into the build descriptor")]
        project_name: Option<String>,
        #[arg(long, help = "Build the release variant")]
        release: bool,
        #[arg(long, help = "Path to the signing keystore")]
        keystore: Option<PathBuf>,
        #[arg(long, help = "Key alias inside the keystore")]
        alias: Option<String>,
        #[arg(long, help = "Keystore password")]
        store_password: Option<String>,
        #[arg(long, help = "Key password")]
        key_password: Option<String>,
        #[arg(long, help = "Keystore type (JKS, PKCS12)")]
        store_type: Option<String>,
        #[arg(long = "ant-arg", help = "Extra argument passed to Ant (repeatable)")]
        ant_args: Vec<String>,
        #[arg(long, help = "Print verbose command lines")]
        verbose: bool,
    },
    /// Run the Ant clean target and remove generated files
    Clean {
        #[arg(long)]
        project_dir: Option<PathBuf>,
        #[arg(long)]
        project_name: Option<String>,
        #[arg(long)]
        verbose: bool,
    },
    /// Check Ant and Android SDK availability
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let cli = Cli::parse();
    let config = AppConfig::load_or_create(&config_dir().join("config.toml"))?;

    match cli.command {
        Command::Build {
            project_dir,
            project_name,
            release,
            keystore,
            alias,
            store_password,
            key_password,
            store_type,
            ant_args,
            verbose,
        } => {
            let project_dir = resolve_project_dir(project_dir, &config)?;
            let package_info =
                package_info_from_args(keystore, alias, store_password, key_password, store_type)?;

            let mut extra_args = config.extra_ant_args.clone();
            extra_args.extend(ant_args);

            let command = BuildCommand {
                project_name: resolve_project_name(project_name, &project_dir),
                project_dir,
                release: release || config.release_by_default,
                package_info,
                extra_args,
                verbose: verbose || config.verbose,
            };
            command.execute().await?;
        }
        Command::Clean {
            project_dir,
            project_name,
            verbose,
        } => {
            let project_dir = resolve_project_dir(project_dir, &config)?;
            let command = CleanCommand {
                project_name: resolve_project_name(project_name, &project_dir),
                project_dir,
                verbose: verbose || config.verbose,
            };
            command.execute().await?;
        }
        Command::Check => {
            CheckCommand.execute().await?;
        }
    }

    Ok(())
}

/// Pick the project root: CLI flag, then config, then current directory.
fn resolve_project_dir(flag: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    let dir = flag
        .or_else(|| config.project_dir.clone())
        .map_or_else(std::env::current_dir, Ok)?;
    if !dir.is_dir() {
        bail!("project directory {:?} does not exist", dir);
    }
    Ok(dir)
}

/// Pick the project name: CLI flag, then the directory's file name.
fn resolve_project_name(flag: Option<String>, project_dir: &PathBuf) -> String {
    flag.unwrap_or_else(|| {
        project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "App".to_string())
    })
}

/// Assemble signing credentials from the individual flags.
/// All-or-nothing: a partial set of flags is an error.
fn package_info_from_args(
    keystore: Option<PathBuf>,
    alias: Option<String>,
    store_password: Option<String>,
    key_password: Option<String>,
    store_type: Option<String>,
) -> Result<Option<PackageInfo>> {
    match (keystore, alias, store_password, key_password) {
        (None, None, None, None) => {
            if store_type.is_some() {
                bail!("--store-type requires the other signing flags");
            }
            Ok(None)
        }
        (Some(keystore), Some(alias), Some(store_password), Some(key_password)) => {
            let mut info = PackageInfo::new(keystore, &alias, &store_password, &key_password);
            if let Some(store_type) = store_type {
                info = info.with_store_type(&store_type);
            }
            Ok(Some(info))
        }
        _ => bail!(
            "signing requires --keystore, --alias, --store-password and --key-password together"
        ),
    }
}
