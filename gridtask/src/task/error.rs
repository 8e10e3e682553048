//! Error types for regional task generation.

use thiserror::Error;

use crate::coord::CoordError;
use crate::extents::ExtentsError;
use crate::pointset::PointSetError;

/// Errors found while validating a job at submission time.
///
/// Every one of these is a property of the whole job, so they are reported
/// once when the template is built rather than once per task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// The job id is empty or blank.
    #[error("Job has no job id")]
    MissingJobId,

    /// Both a grid and an origin point set were supplied.
    #[error("Job specifies both grid origins and an origin point set")]
    AmbiguousOrigins,

    /// Neither a grid nor an origin point set was supplied.
    #[error("Job specifies neither grid origins nor an origin point set")]
    MissingOrigins,

    /// Only some of the grid fields were supplied.
    #[error("Grid origins are missing the '{0}' field")]
    IncompleteGrid(&'static str),

    /// The origins contain no points, so the job has no tasks.
    #[error("Job has no origins")]
    NoOrigins,

    /// A standard regional job needs at least one destination point set.
    #[error("Job has no destination point sets")]
    NoDestinations,

    /// None of the destination point sets contains a point.
    #[error("Destination point sets are all empty")]
    EmptyDestinationExtents,

    /// Many-to-many destinations must all have the same number of points.
    #[error("Destination point set {index} has {found} features, expected {expected}")]
    DestinationCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// One-to-one destinations need a point for every origin.
    #[error("Destination point set {index} has {found} features but the job has {origins} origins")]
    DestinationsShorterThanOrigins {
        index: usize,
        origins: usize,
        found: usize,
    },

    /// Static sites compute from every grid cell to every grid cell.
    #[error("Static site jobs require grid origins")]
    StaticSiteRequiresGridOrigins,

    /// Zoom level or coordinates are invalid.
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Grid rectangle is invalid.
    #[error(transparent)]
    Extents(#[from] ExtentsError),

    /// A point set could not be resolved or read.
    #[error(transparent)]
    PointSet(#[from] PointSetError),
}

/// Errors that can occur while specializing one task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    /// The scheduler asked for a task the job does not have.
    #[error("Task number {task_number} out of range (job has {total} tasks)")]
    TaskNumberOutOfRange { task_number: usize, total: usize },

    /// Origin pixel could not be converted to coordinates.
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Origin lookup failed.
    #[error(transparent)]
    PointSet(#[from] PointSetError),
}
