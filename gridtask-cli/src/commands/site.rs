//! Static site task enumeration command.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use tracing::info;

use gridtask::coord::GeoEnvelope;
use gridtask::site::{PixelTask, PixelTaskGenerator, StaticSiteRequest};

use super::common::{print_json_line, read_json};
use crate::error::CliError;

/// Arguments for the `site` command.
#[derive(Debug, Args)]
pub struct SiteArgs {
    /// Static site request (JSON)
    #[arg(long)]
    pub request: PathBuf,

    /// Transport network envelope as MIN_LON,MAX_LON,MIN_LAT,MAX_LAT, used
    /// when the request has no bounds
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 4,
        allow_hyphen_values = true
    )]
    pub network_bounds: Option<Vec<f64>>,

    /// Maximum number of tasks to print
    #[arg(long)]
    pub limit: Option<usize>,
}

impl SiteArgs {
    fn network_envelope(&self) -> Option<GeoEnvelope> {
        match self.network_bounds.as_deref() {
            Some(&[min_lon, max_lon, min_lat, max_lat]) => {
                Some(GeoEnvelope::new(min_lon, max_lon, min_lat, max_lat))
            }
            _ => None,
        }
    }
}

/// Run the site command.
pub fn run(args: &SiteArgs, out: &mut impl Write) -> Result<(), CliError> {
    let request: StaticSiteRequest = read_json(&args.request)?;
    let network = args.network_envelope();
    let generator = PixelTaskGenerator::for_request(&request, network.as_ref())?;

    let limit = args.limit.unwrap_or(generator.task_count());
    info!(
        job_id = %request.job_id(),
        total = generator.task_count(),
        limit,
        "Enumerating static site tasks"
    );

    for task in generator.tasks().take(limit) {
        print_json_line(out, &task_json(&task))?;
    }
    Ok(())
}

fn task_json(task: &PixelTask<'_>) -> serde_json::Value {
    json!({
        "kind": task.kind(),
        "id": task.id(),
        "x": task.x(),
        "y": task.y(),
        "job_id": task.job_id(),
        "worker_version": task.worker_version(),
    })
}
