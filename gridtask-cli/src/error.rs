//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use gridtask::pointset::PointSetError;
use gridtask::site::SiteError;
use gridtask::task::{TaskError, TemplateError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Input file is not valid JSON for its document type
    Parse {
        path: PathBuf,
        error: serde_json::Error,
    },
    /// Failed to write command output
    Output(std::io::Error),
    /// Invalid grid or point set
    PointSet(PointSetError),
    /// Job rejected at submission
    Template(TemplateError),
    /// Task could not be produced
    Task(TaskError),
    /// Static site task could not be produced
    Site(SiteError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Template(TemplateError::MissingOrigins) = self {
            eprintln!();
            eprintln!("A job needs exactly one origin source:");
            eprintln!("  1. Grid origins: set west, north, width and height");
            eprintln!("  2. Freeform origins: set origin_point_set_key");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::Parse { path, error } => {
                write!(f, "Failed to parse '{}': {}", path.display(), error)
            }
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
            CliError::PointSet(e) => write!(f, "Invalid point set: {}", e),
            CliError::Template(e) => write!(f, "Invalid job: {}", e),
            CliError::Task(e) => write!(f, "Failed to generate task: {}", e),
            CliError::Site(e) => write!(f, "Failed to generate static site task: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::Parse { error, .. } => Some(error),
            CliError::Output(e) => Some(e),
            CliError::PointSet(e) => Some(e),
            CliError::Template(e) => Some(e),
            CliError::Task(e) => Some(e),
            CliError::Site(e) => Some(e),
        }
    }
}

impl From<PointSetError> for CliError {
    fn from(e: PointSetError) -> Self {
        CliError::PointSet(e)
    }
}

impl From<TemplateError> for CliError {
    fn from(e: TemplateError) -> Self {
        CliError::Template(e)
    }
}

impl From<TaskError> for CliError {
    fn from(e: TaskError) -> Self {
        CliError::Task(e)
    }
}

impl From<SiteError> for CliError {
    fn from(e: SiteError) -> Self {
        CliError::Site(e)
    }
}
