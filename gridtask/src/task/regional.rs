//! A single origin's unit of work.

use std::fmt;
use std::sync::Arc;

use super::{RegionalTaskTemplate, REGIONAL_TASK_KIND};
use crate::extents::WebMercatorExtents;

/// One task of a regional analysis: route from one origin.
///
/// Everything that is the same for all tasks of the job stays on the shared
/// [`RegionalTaskTemplate`]; the task only adds what differs per origin.
#[derive(Debug, Clone)]
pub struct RegionalTask {
    template: Arc<RegionalTaskTemplate>,
    task_id: usize,
    from_lat: f64,
    from_lon: f64,
    origin_id: Option<String>,
}

impl RegionalTask {
    pub(super) fn new(
        template: Arc<RegionalTaskTemplate>,
        task_id: usize,
        from_lat: f64,
        from_lon: f64,
        origin_id: Option<String>,
    ) -> Self {
        Self {
            template,
            task_id,
            from_lat,
            from_lon,
            origin_id,
        }
    }

    /// The job this task belongs to.
    pub fn template(&self) -> &Arc<RegionalTaskTemplate> {
        &self.template
    }

    pub fn job_id(&self) -> &str {
        self.template.job_id()
    }

    /// Always [`REGIONAL_TASK_KIND`].
    pub fn kind(&self) -> &'static str {
        REGIONAL_TASK_KIND
    }

    /// Task number within the job; results are keyed by it.
    pub fn task_id(&self) -> usize {
        self.task_id
    }

    /// Origin latitude in degrees.
    pub fn from_lat(&self) -> f64 {
        self.from_lat
    }

    /// Origin longitude in degrees.
    pub fn from_lon(&self) -> f64 {
        self.from_lon
    }

    /// Identifier of the origin point, for freeform origins that carry one.
    pub fn origin_id(&self) -> Option<&str> {
        self.origin_id.as_deref()
    }

    pub fn n_targets_per_origin(&self) -> usize {
        self.template.n_targets_per_origin()
    }

    pub fn web_mercator_extents(&self) -> WebMercatorExtents {
        self.template.web_mercator_extents()
    }
}

impl PartialEq for RegionalTask {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.template, &other.template)
            && self.task_id == other.task_id
            && self.from_lat == other.from_lat
            && self.from_lon == other.from_lon
            && self.origin_id == other.origin_id
    }
}

impl fmt::Display for RegionalTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Job id makes regional progress traceable in logs
        write!(
            f,
            "RegionalTask{{job_id={}, task={}}}",
            self.template.job_id(),
            self.task_id
        )
    }
}
