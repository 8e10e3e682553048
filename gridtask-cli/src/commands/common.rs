//! Common types and utilities shared across CLI commands.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use serde::de::DeserializeOwned;
use serde::Serialize;

use gridtask::coord::GeoEnvelope;

use crate::error::CliError;

/// Geographic bounding box given on the command line.
#[derive(Debug, Clone, Args)]
pub struct BoundsArgs {
    /// Western edge in degrees longitude
    #[arg(long, allow_hyphen_values = true)]
    pub min_lon: f64,

    /// Eastern edge in degrees longitude
    #[arg(long, allow_hyphen_values = true)]
    pub max_lon: f64,

    /// Southern edge in degrees latitude
    #[arg(long, allow_hyphen_values = true)]
    pub min_lat: f64,

    /// Northern edge in degrees latitude
    #[arg(long, allow_hyphen_values = true)]
    pub max_lat: f64,
}

impl BoundsArgs {
    pub fn envelope(&self) -> GeoEnvelope {
        GeoEnvelope::new(self.min_lon, self.max_lon, self.min_lat, self.max_lat)
    }
}

/// Read and deserialize a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.to_path_buf(),
        error,
    })?;
    serde_json::from_str(&contents).map_err(|error| CliError::Parse {
        path: path.to_path_buf(),
        error,
    })
}

/// Write one value as a line of JSON to stdout.
pub fn print_json_line<T: Serialize>(out: &mut impl Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, value)
        .map_err(|e| CliError::Output(io::Error::from(e)))?;
    writeln!(out).map_err(CliError::Output)
}
