//! namecast command-line launcher
//!
//! Parses, generates and selects files by the structure of their names.

use clap::{Parser, Subcommand};
use namecast_logging::{init_logging, LogConfig};
use std::process::ExitCode;

mod cli;

use cli::GlobalArgs;

#[derive(Parser, Debug)]
#[command(name = "namecast", version, about = "Filename schema engine")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Folder the error log is written to
    #[arg(long, global = true, env = "NAMECAST_ERROR_DIR")]
    error_dir: Option<String>,

    /// File origin label used in the error log name
    #[arg(long, global = true)]
    file_origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a filename into schema fields
    Parse(cli::parse::ParseArgs),

    /// Render field values into a filename
    Generate(cli::generate::GenerateArgs),

    /// List the entries of a folder that match every filter
    List(cli::list::ListArgs),

    /// Select the single file in a folder that matches every filter
    Select(cli::select::SelectArgs),

    /// Run the tasks of a config file
    Run(cli::run::RunArgs),

    /// Show resolved paths and configured tasks
    Config(cli::config::ConfigArgs),
}

impl Commands {
    fn wants_json(&self) -> bool {
        match self {
            Commands::Parse(args) => args.json,
            Commands::Generate(args) => args.json,
            Commands::List(args) => args.json,
            Commands::Select(args) => args.json,
            Commands::Run(args) => args.json,
            Commands::Config(args) => args.json,
        }
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    let globals = GlobalArgs {
        error_dir: cli.error_dir,
        file_origin: cli.file_origin,
    };

    match cli.command {
        Commands::Parse(args) => cli::parse::run(args, &globals),
        Commands::Generate(args) => cli::generate::run(args, &globals),
        Commands::List(args) => cli::list::run(args),
        Commands::Select(args) => cli::select::run(args, &globals),
        Commands::Run(args) => cli::run::run(args, &globals),
        Commands::Config(args) => cli::config::run(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = cli.command.wants_json();

    if let Err(err) = init_logging(LogConfig {
        app_name: "namecast",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:#}", err);
            }
            ExitCode::from(1)
        }
    }
}
