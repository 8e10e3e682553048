//! GridTask CLI - Command-line interface
//!
//! Inspects analysis grids and enumerates the tasks a regional analysis or
//! static site export would be split into. Tasks are printed to stdout as
//! JSON lines; logs go to stderr and the log file.

mod commands;
mod error;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gridtask::logging::{default_log_dir, default_log_file, init_logging};

use commands::grid::GridArgs;
use commands::site::SiteArgs;
use commands::tasks::TasksArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "gridtask")]
#[command(version, about = "Web Mercator grids and regional analysis tasks", long_about = None)]
struct Cli {
    /// Directory for the log file
    #[arg(long, global = true, default_value = default_log_dir())]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the pixel grid covering a bounding box
    Grid(GridArgs),

    /// Validate a regional job manifest and print its tasks
    Tasks(TasksArgs),

    /// Print the pixel tasks of a static site
    Site(SiteArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let _logging_guard =
        init_logging(&cli.log_dir, default_log_file()).map_err(CliError::LoggingInit)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Grid(args) => commands::grid::run(&args, &mut out),
        Commands::Tasks(args) => commands::tasks::run(&args, &mut out),
        Commands::Site(args) => commands::site::run(&args, &mut out),
    }
}
