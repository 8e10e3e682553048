//! Regional analysis task generation.
//!
//! A regional analysis routes from many origins. The job is described once,
//! by a [`RegionalTaskTemplate`], and split into one [`RegionalTask`] per
//! origin on demand. Generating a task reads only the template, so the
//! scheduler can produce any task number at any time, on any thread, and
//! regenerate it unchanged when a worker fails.
//!
//! # Flow
//!
//! ```text
//! RegionalJobRequest ──validate──► Arc<RegionalTaskTemplate>
//!                                     │
//!                    make_one_task(n) │  n in 0..n_tasks_total
//!                                     ▼
//!                               RegionalTask ──► worker
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gridtask::pointset::WebMercatorGridPointSet;
//! use gridtask::task::RegionalTaskTemplate;
//!
//! let opportunities = Arc::new(WebMercatorGridPointSet::new(9, 990, 495, 30, 20).unwrap());
//! let template = RegionalTaskTemplate::builder("job-1")
//!     .grid_origins(1000, 500, 10, 4)
//!     .destination(opportunities)
//!     .record_accessibility(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(template.n_tasks_total(), 40);
//! let task = template.make_one_task(23).unwrap();
//! assert_eq!(task.task_id(), 23);
//! ```

mod error;
mod regional;
mod request;
mod template;

pub use error::{TaskError, TemplateError};
pub use regional::RegionalTask;
pub use request::RegionalJobRequest;
pub use template::{OriginSpec, RegionalTaskTemplate, RegionalTaskTemplateBuilder};

use uuid::Uuid;

/// Task kind marker distinguishing regional tasks from static site tasks.
pub const REGIONAL_TASK_KIND: &str = "regional";

/// Generates a job identifier: a random UUID as 32 lowercase hex digits.
pub fn new_job_id() -> String {
    Uuid::new_v4().simple().to_string()
}
