//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `commandpoint_core` linkage with deterministic output.
//! - Load extension directories the way a host loader would and report
//!   which contributed commands survive validation.

use clap::{Parser, Subcommand};
use commandpoint_core::{
    commands_schema, published_registry, register_commands_extension_point, ExtensionDescriptor,
    ExtensionPointRegistry, ExtensionPointUser, COMMANDS_EXTENSION_POINT,
};
use log::info;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Parser)]
#[command(
    name = "commandpoint",
    version,
    about = "Inspect command contributions declared by extensions"
)]
struct Cli {
    /// Absolute directory for rolling log files (logging is off without it)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, value_name = "LEVEL", requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the JSON schema of the `commands` contribution point
    Schema,
    /// Validate `manifest.json` in each extension directory
    Check {
        /// Extension install directories
        #[arg(required = true, value_name = "DIR")]
        dirs: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    if let Some(dir) = &cli.log_dir {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| commandpoint_core::default_log_level());
        commandpoint_core::init_logging(level, &dir.to_string_lossy())?;
    }

    match cli.command {
        None => {
            // Why: keep the bare invocation as a linkage probe that needs no
            // extension directories.
            println!("commandpoint_core ping={}", commandpoint_core::ping());
            println!(
                "commandpoint_core version={}",
                commandpoint_core::core_version()
            );
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Schema) => {
            let rendered = serde_json::to_string_pretty(&commands_schema())
                .map_err(|err| format!("failed to render schema: {err}"))?;
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Check { dirs }) => check(&dirs),
    }
}

fn check(dirs: &[PathBuf]) -> Result<ExitCode, String> {
    let mut users = Vec::with_capacity(dirs.len());
    for dir in dirs {
        users.push(load_extension(dir)?);
    }

    let mut points = ExtensionPointRegistry::new();
    register_commands_extension_point(&mut points).map_err(|err| err.to_string())?;
    points
        .deliver(COMMANDS_EXTENSION_POINT, &mut users)
        .map_err(|err| err.to_string())?;

    let registry = published_registry().ok_or("command registry was not published")?;
    for command in registry.iter() {
        let category = command.category.as_deref().unwrap_or("-");
        println!("ok {} [{}] {}", command.command, category, command.title);
    }

    let mut rejected = 0;
    for user in &users {
        for message in user.collector.messages() {
            rejected += 1;
            println!("error {}: {}", user.description.id, message);
        }
    }
    info!(
        "event=cli_check module=cli status=ok extensions={} accepted={} rejected={}",
        users.len(),
        registry.len(),
        rejected
    );

    Ok(if rejected == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_extension(dir: &Path) -> Result<ExtensionPointUser, String> {
    let root = dir
        .canonicalize()
        .map_err(|err| format!("cannot resolve `{}`: {err}", dir.display()))?;
    let manifest_path = root.join(MANIFEST_FILE_NAME);
    let raw = std::fs::read_to_string(&manifest_path)
        .map_err(|err| format!("cannot read `{}`: {err}", manifest_path.display()))?;
    let manifest: Value = serde_json::from_str(&raw)
        .map_err(|err| format!("invalid JSON in `{}`: {err}", manifest_path.display()))?;

    let descriptor = ExtensionDescriptor::new(
        manifest["id"].as_str().unwrap_or_default(),
        manifest["version"].as_str().unwrap_or_default(),
        root,
    );
    descriptor
        .validate()
        .map_err(|err| format!("`{}`: {err}", manifest_path.display()))?;

    let commands = manifest
        .get("contributes")
        .and_then(|contributes| contributes.get(COMMANDS_EXTENSION_POINT))
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    Ok(ExtensionPointUser::new(
        COMMANDS_EXTENSION_POINT,
        descriptor,
        commands,
    ))
}
