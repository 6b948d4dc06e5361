//! Config command - show resolved paths and configured tasks

use super::output::{print_json, print_table};
use anyhow::Context;
use namecast::settings::{default_config_path, default_error_directory, Settings};
use namecast_logging::{logs_dir, namecast_home};
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Config file (default: <home>/namecast.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a default config file if none exists
    #[arg(long)]
    pub init: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ConfigOutput {
    home: String,
    config_path: String,
    config_exists: bool,
    created: bool,
    logs_dir: String,
    error_directory: String,
    data_directory: Option<String>,
    tasks: Vec<TaskSummary>,
}

#[derive(Debug, Serialize)]
struct TaskSummary {
    name: String,
    inputs: usize,
    output_directory: String,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let config_path = args.config.unwrap_or_else(default_config_path);
    let created = args.init && !config_path.exists();
    if created {
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Settings::default()
            .save(&config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }
    let config_exists = config_path.exists();
    let settings = if config_exists {
        Some(Settings::load(&config_path)?)
    } else {
        None
    };

    let output = ConfigOutput {
        home: namecast_home().display().to_string(),
        config_path: config_path.display().to_string(),
        config_exists,
        created,
        logs_dir: logs_dir().display().to_string(),
        error_directory: settings
            .as_ref()
            .map(|s| s.error_directory.clone())
            .unwrap_or_else(default_error_directory),
        data_directory: settings.as_ref().map(|s| s.data_directory.clone()),
        tasks: settings
            .iter()
            .flat_map(|s| s.tasks.iter())
            .map(|t| TaskSummary {
                name: t.name.clone(),
                inputs: t.inputs.len(),
                output_directory: t.output_directory.clone(),
            })
            .collect(),
    };

    if args.json {
        return print_json(&output);
    }

    println!("Home:        {}", output.home);
    println!(
        "Config:      {}{}",
        output.config_path,
        if output.created {
            " (created)"
        } else if output.config_exists {
            ""
        } else {
            " (not found)"
        }
    );
    println!("Logs:        {}", output.logs_dir);
    println!("Error logs:  {}", output.error_directory);
    if let Some(data) = &output.data_directory {
        println!("Data:        {}", data);
    }

    if !output.tasks.is_empty() {
        println!();
        let rows = output
            .tasks
            .iter()
            .map(|t| vec![t.name.clone(), t.inputs.to_string(), t.output_directory.clone()])
            .collect();
        print_table(&["Task", "Inputs", "Output Directory"], rows);
    }
    Ok(())
}
