//! Generate command - render field values into a filename

use super::context::CommandContext;
use super::output::{print_json, reported_errors, ReportedError};
use super::{parse_assignments, GlobalArgs};
use namecast::paths::ensure_path;
use namecast::record::ParsedRecord;
use namecast::schema;
use serde::Serialize;

/// Arguments for the generate command
#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Field value as FIELD=VALUE, in filename order. `extension=.csv` sets the extension.
    #[arg(short = 'V', long = "value", required = true)]
    pub values: Vec<String>,

    /// Delimiter between fields
    #[arg(short = 'd', long, default_value = "-")]
    pub delimiter: String,

    /// Folder prefix, prepended as given
    #[arg(long)]
    pub folder: Option<String>,

    /// Extension to append, including the period
    #[arg(short = 'e', long)]
    pub extension: Option<String>,

    /// Create the folder (and its parents) if missing
    #[arg(long)]
    pub ensure_folder: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    filename: String,
    created_directories: usize,
    errors: Vec<ReportedError>,
}

pub fn run(args: GenerateArgs, globals: &GlobalArgs) -> anyhow::Result<()> {
    let mut ctx = CommandContext::new(globals, "generate");
    let result = execute(&args, &mut ctx);
    ctx.finish(result)
}

fn execute(args: &GenerateArgs, ctx: &mut CommandContext) -> anyhow::Result<()> {
    let values = parse_assignments(&args.values, "--value")?;
    let record = ParsedRecord::from_fields(values);

    let created_directories = match (&args.folder, args.ensure_folder) {
        (Some(folder), true) => ensure_path(folder)?,
        _ => 0,
    };

    let filename = schema::generate(
        &record,
        &args.delimiter,
        args.folder.as_deref(),
        args.extension.as_deref(),
        &mut ctx.sink,
    );

    if args.json {
        return print_json(&GenerateOutput {
            filename,
            created_directories,
            errors: reported_errors(ctx.sink.errors()),
        });
    }

    println!("{}", filename);
    Ok(())
}
