//! Regional task template.
//!
//! A [`RegionalTaskTemplate`] is built once per job and then only read. It
//! knows where the origins are, which destinations to route to and what to
//! record; [`RegionalTaskTemplate::make_one_task`] turns it plus a task
//! number into one [`RegionalTask`].

use std::ops::Range;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{RegionalJobRequest, RegionalTask, TaskError, TemplateError};
use crate::coord::{pixel_to_center_lat, pixel_to_center_lon, CoordError, DEFAULT_ZOOM, MAX_ZOOM};
use crate::extents::WebMercatorExtents;
use crate::pointset::{PointSet, PointSetSource, WebMercatorGridPointSet};

/// Where the origins of a job come from.
///
/// A job has exactly one origin source: either the cells of its own grid or
/// an externally supplied point set.
#[derive(Debug, Clone)]
pub enum OriginSpec {
    /// Every pixel of the template's grid is an origin, in row-major order.
    Implicit(WebMercatorGridPointSet),

    /// Origins are the points of a freeform point set, in index order.
    Explicit(Arc<dyn PointSet>),
}

impl OriginSpec {
    /// Number of origins, which is also the number of tasks in the job.
    pub fn feature_count(&self) -> usize {
        match self {
            OriginSpec::Implicit(grid) => grid.feature_count(),
            OriginSpec::Explicit(points) => points.feature_count(),
        }
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self, OriginSpec::Implicit(_))
    }
}

/// Immutable description of a whole regional analysis job.
#[derive(Debug)]
pub struct RegionalTaskTemplate {
    job_id: String,
    zoom: u8,
    origins: OriginSpec,
    destinations: Vec<Arc<dyn PointSet>>,
    one_to_one: bool,
    record_times: bool,
    record_accessibility: bool,
    make_taui_site: bool,
    n_tasks_total: usize,
    extents: WebMercatorExtents,
}

impl RegionalTaskTemplate {
    /// Starts building a template for the given job.
    pub fn builder(job_id: impl Into<String>) -> RegionalTaskTemplateBuilder {
        RegionalTaskTemplateBuilder::new(job_id)
    }

    /// Validates a submitted job and resolves its point set keys.
    pub fn from_request(
        request: &RegionalJobRequest,
        source: &dyn PointSetSource,
    ) -> Result<Arc<Self>, TemplateError> {
        let mut builder = Self::builder(request.job_id.clone())
            .zoom(request.zoom)
            .one_to_one(request.one_to_one)
            .record_times(request.record_times)
            .record_accessibility(request.record_accessibility)
            .make_taui_site(request.make_taui_site);

        let grid = request.grid_origins()?;
        if grid.is_some() && request.origin_point_set_key.is_some() {
            warn!(job_id = %request.job_id, "Rejected regional job with two origin sources");
            return Err(TemplateError::AmbiguousOrigins);
        }

        if let Some((west, north, width, height)) = grid {
            builder = builder.grid_origins(west, north, width, height);
        }
        if let Some(key) = &request.origin_point_set_key {
            builder = builder.origin_point_set(source.point_set(key)?);
        }
        for key in &request.destination_point_set_keys {
            builder = builder.destination(source.point_set(key)?);
        }

        builder.build()
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn origins(&self) -> &OriginSpec {
        &self.origins
    }

    pub fn destinations(&self) -> &[Arc<dyn PointSet>] {
        &self.destinations
    }

    pub fn one_to_one(&self) -> bool {
        self.one_to_one
    }

    pub fn record_times(&self) -> bool {
        self.record_times
    }

    pub fn record_accessibility(&self) -> bool {
        self.record_accessibility
    }

    pub fn make_taui_site(&self) -> bool {
        self.make_taui_site
    }

    /// Total number of tasks in the job (one per origin).
    pub fn n_tasks_total(&self) -> usize {
        self.n_tasks_total
    }

    /// Number of destinations each origin is routed to.
    ///
    /// One-to-one jobs pair origin `i` with destination `i` only. Static
    /// sites route to every cell of their own grid. Otherwise every origin
    /// reaches every point of the destination sets, which all have the same
    /// size.
    pub fn n_targets_per_origin(&self) -> usize {
        if self.one_to_one {
            1
        } else if self.make_taui_site {
            self.extents.pixel_count()
        } else {
            // Validation guarantees at least one destination set here
            self.destinations
                .first()
                .map_or(0, |destinations| destinations.feature_count())
        }
    }

    /// Pixel rectangle the worker has to route over.
    ///
    /// For static sites this is the template's own grid. For standard jobs
    /// it is the smallest rectangle covering every destination set: travel
    /// times to places outside the destinations cannot change any
    /// accessibility result. This ignores the street network's own extent,
    /// which may be smaller.
    pub fn web_mercator_extents(&self) -> WebMercatorExtents {
        self.extents
    }

    /// Produces the task for one origin.
    ///
    /// This is a pure function of the template and `task_number`: calling it
    /// again, on any thread, yields an identical task. That is what lets the
    /// scheduler retry a task after a worker failure.
    pub fn make_one_task(self: &Arc<Self>, task_number: usize) -> Result<RegionalTask, TaskError> {
        if task_number >= self.n_tasks_total {
            return Err(TaskError::TaskNumberOutOfRange {
                task_number,
                total: self.n_tasks_total,
            });
        }

        let (from_lat, from_lon, origin_id) = match &self.origins {
            OriginSpec::Implicit(grid) => {
                let width = grid.width() as usize;
                let x = (task_number % width) as u32;
                let y = (task_number / width) as u32;
                (
                    pixel_to_center_lat(grid.north() + y, grid.zoom())?,
                    pixel_to_center_lon(grid.west() + x, grid.zoom())?,
                    None,
                )
            }
            OriginSpec::Explicit(points) => (
                points.get_lat(task_number)?,
                points.get_lon(task_number)?,
                points.get_id(task_number)?,
            ),
        };

        debug!(
            job_id = %self.job_id,
            task_id = task_number,
            from_lat,
            from_lon,
            "Specialized regional task"
        );

        Ok(RegionalTask::new(
            Arc::clone(self),
            task_number,
            from_lat,
            from_lon,
            origin_id,
        ))
    }

    /// Lazily produces the tasks for a range of task numbers.
    pub fn make_tasks(
        self: &Arc<Self>,
        task_numbers: Range<usize>,
    ) -> impl Iterator<Item = Result<RegionalTask, TaskError>> + '_ {
        task_numbers.map(move |task_number| self.make_one_task(task_number))
    }

    /// Produces the tasks for a range of task numbers in parallel.
    ///
    /// Tasks are returned in task number order.
    pub fn par_make_tasks(
        self: &Arc<Self>,
        task_numbers: Range<usize>,
    ) -> Result<Vec<RegionalTask>, TaskError> {
        task_numbers
            .into_par_iter()
            .map(|task_number| self.make_one_task(task_number))
            .collect()
    }
}

/// Builder for [`RegionalTaskTemplate`].
///
/// All job-wide checks happen in [`build`](Self::build), so a template that
/// exists is a template that can produce every one of its tasks.
#[derive(Debug)]
pub struct RegionalTaskTemplateBuilder {
    job_id: String,
    zoom: u8,
    grid: Option<(u32, u32, u32, u32)>,
    origin_point_set: Option<Arc<dyn PointSet>>,
    destinations: Vec<Arc<dyn PointSet>>,
    one_to_one: bool,
    record_times: bool,
    record_accessibility: bool,
    make_taui_site: bool,
}

impl RegionalTaskTemplateBuilder {
    fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            zoom: DEFAULT_ZOOM,
            grid: None,
            origin_point_set: None,
            destinations: Vec::new(),
            one_to_one: false,
            record_times: false,
            record_accessibility: false,
            make_taui_site: false,
        }
    }

    /// Set the zoom level (default 9).
    pub fn zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Use every pixel of this grid as an origin.
    pub fn grid_origins(mut self, west: u32, north: u32, width: u32, height: u32) -> Self {
        self.grid = Some((west, north, width, height));
        self
    }

    /// Use the points of this set as origins.
    pub fn origin_point_set(mut self, origins: Arc<dyn PointSet>) -> Self {
        self.origin_point_set = Some(origins);
        self
    }

    /// Add a destination point set.
    pub fn destination(mut self, destinations: Arc<dyn PointSet>) -> Self {
        self.destinations.push(destinations);
        self
    }

    pub fn one_to_one(mut self, enabled: bool) -> Self {
        self.one_to_one = enabled;
        self
    }

    pub fn record_times(mut self, enabled: bool) -> Self {
        self.record_times = enabled;
        self
    }

    pub fn record_accessibility(mut self, enabled: bool) -> Self {
        self.record_accessibility = enabled;
        self
    }

    pub fn make_taui_site(mut self, enabled: bool) -> Self {
        self.make_taui_site = enabled;
        self
    }

    /// Validates the job and freezes it into a shareable template.
    pub fn build(self) -> Result<Arc<RegionalTaskTemplate>, TemplateError> {
        let job_id = self.job_id.clone();
        match self.validate() {
            Ok(template) => {
                info!(
                    job_id = %template.job_id,
                    tasks = template.n_tasks_total,
                    targets_per_origin = template.n_targets_per_origin(),
                    zoom = template.zoom,
                    grid_origins = template.origins.is_implicit(),
                    one_to_one = template.one_to_one,
                    taui_site = template.make_taui_site,
                    "Regional job template created"
                );
                Ok(Arc::new(template))
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Rejected regional job");
                Err(e)
            }
        }
    }

    fn validate(self) -> Result<RegionalTaskTemplate, TemplateError> {
        if self.job_id.trim().is_empty() {
            return Err(TemplateError::MissingJobId);
        }
        if self.zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(self.zoom).into());
        }

        let origins = match (self.grid, self.origin_point_set) {
            (Some(_), Some(_)) => return Err(TemplateError::AmbiguousOrigins),
            (None, None) => return Err(TemplateError::MissingOrigins),
            (Some((west, north, width, height)), None) => OriginSpec::Implicit(
                WebMercatorGridPointSet::new(self.zoom, west, north, width, height)?,
            ),
            (None, Some(points)) => OriginSpec::Explicit(points),
        };

        let n_tasks_total = origins.feature_count();
        if n_tasks_total == 0 {
            return Err(TemplateError::NoOrigins);
        }

        let extents = if self.make_taui_site {
            match &origins {
                OriginSpec::Implicit(grid) => grid.extents(),
                OriginSpec::Explicit(_) => return Err(TemplateError::StaticSiteRequiresGridOrigins),
            }
        } else {
            if self.destinations.is_empty() {
                return Err(TemplateError::NoDestinations);
            }
            WebMercatorExtents::for_point_sets(&self.destinations, self.zoom)?
                .ok_or(TemplateError::EmptyDestinationExtents)?
        };

        if self.one_to_one {
            for (index, destinations) in self.destinations.iter().enumerate() {
                let found = destinations.feature_count();
                if found < n_tasks_total {
                    return Err(TemplateError::DestinationsShorterThanOrigins {
                        index,
                        origins: n_tasks_total,
                        found,
                    });
                }
            }
        } else if !self.make_taui_site {
            let expected = self.destinations[0].feature_count();
            for (index, destinations) in self.destinations.iter().enumerate().skip(1) {
                let found = destinations.feature_count();
                if found != expected {
                    return Err(TemplateError::DestinationCountMismatch {
                        index,
                        expected,
                        found,
                    });
                }
            }
        }

        Ok(RegionalTaskTemplate {
            job_id: self.job_id,
            zoom: self.zoom,
            origins,
            destinations: self.destinations,
            one_to_one: self.one_to_one,
            record_times: self.record_times,
            record_accessibility: self.record_accessibility,
            make_taui_site: self.make_taui_site,
            n_tasks_total,
            extents,
        })
    }
}
