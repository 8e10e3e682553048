//! Regional task enumeration command.
//!
//! Reads a job manifest, validates it the way job submission does, and prints
//! the tasks a scheduler would hand to workers.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use gridtask::extents::WebMercatorExtents;
use gridtask::pointset::{PointSet, WebMercatorGridPointSet};
use gridtask::task::{RegionalJobRequest, RegionalTask, RegionalTaskTemplate};

use super::common::{print_json_line, read_json};
use crate::error::CliError;

/// Arguments for the `tasks` command.
#[derive(Debug, Args)]
pub struct TasksArgs {
    /// Job manifest (JSON)
    #[arg(long)]
    pub job: PathBuf,

    /// First task number to print
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Number of tasks to print (default: through the last task)
    #[arg(long)]
    pub count: Option<usize>,

    /// Generate the tasks on all cores
    #[arg(long)]
    pub parallel: bool,
}

/// A job request together with the grids its keys refer to.
#[derive(Debug, Deserialize)]
pub struct JobManifest {
    pub request: RegionalJobRequest,

    /// Opportunity grids by storage key
    #[serde(default)]
    pub point_sets: HashMap<String, WebMercatorExtents>,
}

impl JobManifest {
    /// Grids for every key in the manifest; their extents were validated on parse.
    pub fn point_set_source(&self) -> HashMap<String, Arc<dyn PointSet>> {
        let mut sets: HashMap<String, Arc<dyn PointSet>> = HashMap::new();
        for (key, extents) in &self.point_sets {
            let grid = WebMercatorGridPointSet::from(*extents);
            sets.insert(key.clone(), Arc::new(grid));
        }
        sets
    }
}

/// Run the tasks command.
pub fn run(args: &TasksArgs, out: &mut impl Write) -> Result<(), CliError> {
    let manifest: JobManifest = read_json(&args.job)?;
    let source = manifest.point_set_source();
    let template = RegionalTaskTemplate::from_request(&manifest.request, &source)?;

    let total = template.n_tasks_total();
    let count = args.count.unwrap_or(total.saturating_sub(args.start));
    let range = args.start..args.start.saturating_add(count);
    info!(
        job_id = %template.job_id(),
        total,
        start = range.start,
        end = range.end,
        "Enumerating regional tasks"
    );

    if args.parallel {
        for task in template.par_make_tasks(range)? {
            print_json_line(out, &task_json(&task))?;
        }
    } else {
        for task in template.make_tasks(range) {
            print_json_line(out, &task_json(&task?))?;
        }
    }
    Ok(())
}

fn task_json(task: &RegionalTask) -> serde_json::Value {
    json!({
        "job_id": task.job_id(),
        "kind": task.kind(),
        "task_id": task.task_id(),
        "from_lat": task.from_lat(),
        "from_lon": task.from_lon(),
        "origin_id": task.origin_id(),
        "n_targets_per_origin": task.n_targets_per_origin(),
    })
}
