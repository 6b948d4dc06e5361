//! Parse command - split a filename into schema fields

use super::context::CommandContext;
use super::error::HelpfulError;
use super::output::{print_json, print_table, reported_errors, ReportedError};
use super::{parse_assignments, GlobalArgs};
use namecast::cast::CastRules;
use namecast::record::ParsedRecord;
use namecast::schema::{self, FilenameSchema};
use serde::Serialize;

/// Arguments for the parse command
#[derive(Debug, clap::Args)]
pub struct ParseArgs {
    /// Filename to parse (a bare name, not a path)
    pub filename: String,

    /// Schema field, in filename order. A field named `extension` receives the extension.
    #[arg(short = 'f', long = "field", required = true)]
    pub fields: Vec<String>,

    /// Delimiter between fields
    #[arg(short = 'd', long, default_value = "-")]
    pub delimiter: String,

    /// Cast rule as FIELD=TAG (str, int, float, bool, date:<format>)
    #[arg(short = 'c', long = "cast")]
    pub casts: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    filename: &'a str,
    record: &'a ParsedRecord,
    errors: Vec<ReportedError>,
}

pub fn run(args: ParseArgs, globals: &GlobalArgs) -> anyhow::Result<()> {
    let mut ctx = CommandContext::new(globals, "parse");
    let result = execute(&args, &mut ctx);
    ctx.finish(result)
}

fn execute(args: &ParseArgs, ctx: &mut CommandContext) -> anyhow::Result<()> {
    let schema = FilenameSchema::new(args.fields.iter().cloned())
        .map_err(|e| HelpfulError::invalid_schema(&e.to_string()))?;
    let tags = parse_assignments(&args.casts, "--cast")?;
    let rules = CastRules::from_tags(
        tags.iter().map(|(field, tag)| (field.as_str(), tag.as_str())),
        &mut ctx.sink,
    );

    let record = schema::parse(
        &args.filename,
        &args.delimiter,
        &schema,
        Some(&rules),
        &mut ctx.sink,
    )?;

    if args.json {
        return print_json(&ParseOutput {
            filename: &args.filename,
            record: &record,
            errors: reported_errors(ctx.sink.errors()),
        });
    }

    let rows = record
        .fields()
        .map(|(name, value)| vec![name.to_string(), value.to_string()])
        .collect();
    print_table(&["Field", "Value"], rows);
    Ok(())
}
