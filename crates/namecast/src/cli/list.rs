//! List command - show the filtered entries of one folder

use super::output::{print_json, print_table};
use namecast::discovery::{DiscoveryOptions, FileDiscovery};
use serde::Serialize;
use std::path::Path;

/// Arguments for the list command
#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Folder to list (created if missing)
    pub folder: String,

    /// Substring the name must contain (case-insensitive). Repeat to require several.
    #[arg(short = 'F', long = "filter")]
    pub filters: Vec<String>,

    /// Include folders
    #[arg(long)]
    pub include_folders: bool,

    /// Leave out regular files
    #[arg(long)]
    pub no_files: bool,

    /// Include hidden entries (leading dot followed by a letter)
    #[arg(long)]
    pub include_hidden: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    folder: &'a str,
    entries: Vec<String>,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    let options = DiscoveryOptions {
        ignore_hidden: !args.include_hidden,
        include_files: !args.no_files,
        include_folders: args.include_folders,
        conditions: args.filters.clone(),
    };
    let entries = FileDiscovery::new(args.folder.clone(), options).list()?;

    if args.json {
        return print_json(&ListOutput {
            folder: &args.folder,
            entries,
        });
    }

    if entries.is_empty() {
        println!("No entries matched in: {}", args.folder);
        return Ok(());
    }

    let folder = Path::new(&args.folder);
    let rows = entries
        .into_iter()
        .map(|name| {
            let kind = if folder.join(&name).is_dir() { "folder" } else { "file" };
            vec![name, kind.to_string()]
        })
        .collect();
    print_table(&["Name", "Kind"], rows);
    Ok(())
}
