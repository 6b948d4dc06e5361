//! Select command - find the single file matching every filter

use super::context::CommandContext;
use super::output::{print_json, reported_errors, ReportedError};
use super::GlobalArgs;
use namecast::discovery::select_one;
use serde::Serialize;

/// Arguments for the select command
#[derive(Debug, clap::Args)]
pub struct SelectArgs {
    /// Folder to search (created if missing)
    pub folder: String,

    /// Substring the name must contain (case-insensitive). Repeat to require several.
    #[arg(short = 'F', long = "filter")]
    pub filters: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SelectOutput {
    selected: Option<String>,
    errors: Vec<ReportedError>,
}

pub fn run(args: SelectArgs, globals: &GlobalArgs) -> anyhow::Result<()> {
    let mut ctx = CommandContext::new(globals, "select");
    let result = execute(&args, &mut ctx);
    ctx.finish(result)
}

fn execute(args: &SelectArgs, ctx: &mut CommandContext) -> anyhow::Result<()> {
    let selected = select_one(&args.folder, &args.filters, &mut ctx.sink)?;

    if args.json {
        return print_json(&SelectOutput {
            selected,
            errors: reported_errors(ctx.sink.errors()),
        });
    }

    // An empty line means no usable selection; the reason is on stderr and in the error log.
    println!("{}", selected.unwrap_or_default());
    Ok(())
}
