//! Run command - execute the tasks of a config file
//!
//! For each task the error sink is tagged with the task name, every input is
//! selected from the data directory by its filter conditions and its name parsed
//! with the input schema, the output directory is provisioned and the output
//! filename generated. Pending errors are flushed once per task.

use super::context::CommandContext;
use super::error::HelpfulError;
use super::output::{print_json, print_table, reported_errors, ReportedError};
use super::GlobalArgs;
use namecast::discovery::select_one;
use namecast::paths::ensure_path;
use namecast::record::ParsedRecord;
use namecast::schema;
use namecast::settings::{default_config_path, Settings, TaskConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the run command
#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Config file (default: <home>/namecast.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run only this task
    #[arg(long)]
    pub task: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct InputReport {
    name: String,
    selected: Option<String>,
    record: Option<ParsedRecord>,
}

#[derive(Debug, Serialize)]
struct TaskReport {
    task: String,
    inputs: Vec<InputReport>,
    output: String,
    errors: Vec<ReportedError>,
}

pub fn run(args: RunArgs, globals: &GlobalArgs) -> anyhow::Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    if !config_path.exists() {
        return Err(HelpfulError::config_not_found(&config_path).into());
    }
    let settings = Settings::load(&config_path)
        .map_err(|e| HelpfulError::invalid_config(&config_path, &e.to_string()))?;

    let tasks: Vec<&TaskConfig> = match &args.task {
        Some(name) => {
            let task = settings.task(name).ok_or_else(|| {
                let known: Vec<String> = settings.tasks.iter().map(|t| t.name.clone()).collect();
                HelpfulError::task_not_found(name, &known)
            })?;
            vec![task]
        }
        None => settings.tasks.iter().collect(),
    };

    let first = tasks.first().map(|t| t.name.as_str()).unwrap_or("run");
    let mut ctx = CommandContext::with_defaults(
        globals,
        first,
        settings.error_directory.clone(),
        &settings.file_origin,
    );

    let mut reports = Vec::with_capacity(tasks.len());
    for task in tasks {
        ctx.sink.set_task_origin(task.name.as_str());
        let report = match run_task(&settings, task, &mut ctx) {
            Ok(report) => report,
            Err(e) => return ctx.finish(Err(e)),
        };
        // --error-dir wins over a task's own error folder.
        let folder = task
            .error_directory
            .clone()
            .filter(|_| globals.error_dir.is_none());
        ctx.flush_pending(folder)?;
        ctx.sink.clear_task_origin();
        reports.push(report);
    }

    let result = if args.json {
        print_json(&reports)
    } else {
        print_plan(&reports);
        Ok(())
    };
    ctx.finish(result)
}

fn run_task(
    settings: &Settings,
    task: &TaskConfig,
    ctx: &mut CommandContext,
) -> anyhow::Result<TaskReport> {
    info!(task = %task.name, inputs = task.inputs.len(), "Running task");

    let mut inputs = Vec::with_capacity(task.inputs.len());
    for input in &task.inputs {
        let selected = select_one(
            &settings.data_directory,
            &input.filter_conditions,
            &mut ctx.sink,
        )?;
        let record = match &selected {
            Some(filename) => {
                let input_schema = input.schema()?;
                let rules = input.cast_rules(&mut ctx.sink);
                Some(schema::parse(
                    filename,
                    &settings.delimiter,
                    &input_schema,
                    Some(&rules),
                    &mut ctx.sink,
                )?)
            }
            None => None,
        };
        inputs.push(InputReport {
            name: input.name.clone(),
            selected,
            record,
        });
    }

    let created = ensure_path(&task.output_directory)?;
    if created > 0 {
        info!(task = %task.name, folder = %task.output_directory, created, "Created output folder");
    }
    let folder = if task.output_directory.ends_with('/') {
        task.output_directory.clone()
    } else {
        format!("{}/", task.output_directory)
    };
    let output = schema::generate(
        &task.output_record(),
        &settings.delimiter,
        Some(&folder),
        task.output_extension.as_deref(),
        &mut ctx.sink,
    );

    Ok(TaskReport {
        task: task.name.clone(),
        inputs,
        output,
        errors: reported_errors(ctx.sink.errors()),
    })
}

fn print_plan(reports: &[TaskReport]) {
    if reports.is_empty() {
        println!("No tasks configured.");
        return;
    }

    for report in reports {
        println!("Task: {}", report.task);
        let rows = report
            .inputs
            .iter()
            .map(|input| {
                let record = input
                    .record
                    .as_ref()
                    .map(|r| {
                        r.fields()
                            .map(|(name, value)| format!("{}={}", name, value))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_else(|| "-".to_string());
                vec![
                    input.name.clone(),
                    input.selected.clone().unwrap_or_else(|| "(none)".to_string()),
                    record,
                ]
            })
            .collect();
        print_table(&["Input", "Selected", "Fields"], rows);
        println!("Output: {}", report.output);
        if !report.errors.is_empty() {
            println!("Errors: {}", report.errors.len());
        }
        println!();
    }
}
