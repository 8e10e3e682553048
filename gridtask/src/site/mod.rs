//! Static site export tasks.
//!
//! A static site precomputes travel times from every cell of a grid so the
//! results can be served as plain files with no analysis backend behind them.
//! The parent [`StaticSiteRequest`] carries everything the cells have in
//! common; [`PixelTaskGenerator`] hands out one [`PixelTask`] per cell,
//! addressed only by its pixel offset from the northwest corner.
//!
//! # Example
//!
//! ```
//! use gridtask::coord::GeoEnvelope;
//! use gridtask::site::{PixelTaskGenerator, StaticSiteRequest};
//!
//! let request = StaticSiteRequest::new("network-1", "v4.0.0", "sites", "nyc")
//!     .with_bounds(GeoEnvelope::new(-74.05, -73.75, 40.55, 40.90));
//! let generator = PixelTaskGenerator::for_request(&request, None).unwrap();
//!
//! let first = generator.tasks().next().unwrap();
//! assert_eq!(first.id(), "0_0");
//! assert_eq!(first.job_id(), request.job_id());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::coord::{GeoEnvelope, DEFAULT_ZOOM};
use crate::extents::WebMercatorExtents;
use crate::pointset::{PointSetError, WebMercatorGridPointSet};
use crate::task::new_job_id;

/// Task kind marker distinguishing static site tasks from regional tasks.
pub const STATIC_TASK_KIND: &str = "static";

/// Errors that can occur while generating static site tasks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SiteError {
    /// Neither the request nor the caller supplied bounds.
    #[error("Static site request has no bounds and no network envelope was given")]
    MissingBounds,

    /// Pixel offset lies outside the site.
    #[error("Pixel ({x}, {y}) outside the {width}x{height} site")]
    PixelOutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Task number is not below the number of pixels.
    #[error("Task number {task_number} out of range (site has {total} pixels)")]
    TaskNumberOutOfRange { task_number: usize, total: usize },

    /// Bounds could not be turned into a grid.
    #[error(transparent)]
    PointSet(#[from] PointSetError),
}

/// Configuration for a static site export.
///
/// The job id is generated once, when the request is created or
/// deserialized without one, and shared by every pixel task so the workers'
/// outputs can be grouped back together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticSiteRequest {
    /// Transport network to route on.
    pub transport_network_id: String,

    /// Worker version that must process the tasks.
    pub worker_version: String,

    /// Routing profile parameters, passed through to the workers untouched.
    #[serde(default)]
    pub request: serde_json::Value,

    /// Bucket receiving the results.
    pub bucket: String,

    /// Key prefix for the results.
    pub prefix: String,

    /// Site bounds; computed from the transport network when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<GeoEnvelope>,

    /// Zoom level of the site grid.
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    #[serde(default = "new_job_id")]
    job_id: String,
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

impl StaticSiteRequest {
    /// Creates a request with a fresh job id, no bounds and default zoom.
    pub fn new(
        transport_network_id: impl Into<String>,
        worker_version: impl Into<String>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            transport_network_id: transport_network_id.into(),
            worker_version: worker_version.into(),
            request: serde_json::Value::Null,
            bucket: bucket.into(),
            prefix: prefix.into(),
            bounds: None,
            zoom: DEFAULT_ZOOM,
            job_id: new_job_id(),
        }
    }

    /// Set explicit site bounds.
    pub fn with_bounds(mut self, bounds: GeoEnvelope) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the site zoom level.
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the routing profile parameters.
    pub fn with_profile(mut self, request: serde_json::Value) -> Self {
        self.request = request;
        self
    }

    /// Identifier shared by every pixel task of this site.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Pixel rectangle of the site.
    ///
    /// Uses the request's own bounds when set, otherwise the envelope of the
    /// transport network supplied by the caller.
    pub fn extents(&self, network: Option<&GeoEnvelope>) -> Result<WebMercatorExtents, SiteError> {
        let envelope = self
            .bounds
            .as_ref()
            .or(network)
            .ok_or(SiteError::MissingBounds)?;
        Ok(WebMercatorGridPointSet::from_envelope(envelope, self.zoom)?.extents())
    }
}

/// One cell of a static site.
///
/// Borrows its parent request for every field the cells share.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelTask<'a> {
    request: &'a StaticSiteRequest,
    x: u32,
    y: u32,
    id: String,
}

impl<'a> PixelTask<'a> {
    fn new(request: &'a StaticSiteRequest, x: u32, y: u32) -> Self {
        Self {
            request,
            x,
            y,
            id: format!("{}_{}", x, y),
        }
    }

    /// Always [`STATIC_TASK_KIND`].
    pub fn kind(&self) -> &'static str {
        STATIC_TASK_KIND
    }

    /// Pixel offset east of the site's western edge.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Pixel offset south of the site's northern edge.
    pub fn y(&self) -> u32 {
        self.y
    }

    /// `"{x}_{y}"`, unique within the site.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn request(&self) -> &'a StaticSiteRequest {
        self.request
    }

    pub fn job_id(&self) -> &'a str {
        self.request.job_id()
    }

    pub fn worker_version(&self) -> &'a str {
        &self.request.worker_version
    }

    pub fn transport_network_id(&self) -> &'a str {
        &self.request.transport_network_id
    }

    /// Routing profile shared by the whole site.
    pub fn profile(&self) -> &'a serde_json::Value {
        &self.request.request
    }
}

/// Hands out the pixel tasks of one static site.
#[derive(Debug, Clone)]
pub struct PixelTaskGenerator<'a> {
    request: &'a StaticSiteRequest,
    extents: WebMercatorExtents,
}

impl<'a> PixelTaskGenerator<'a> {
    /// Creates a generator over already resolved extents.
    pub fn new(request: &'a StaticSiteRequest, extents: WebMercatorExtents) -> Self {
        info!(
            job_id = %request.job_id(),
            zoom = extents.zoom,
            west = extents.west,
            north = extents.north,
            width = extents.width,
            height = extents.height,
            "Static site task generator created"
        );
        Self { request, extents }
    }

    /// Resolves the request's extents and creates a generator over them.
    pub fn for_request(
        request: &'a StaticSiteRequest,
        network: Option<&GeoEnvelope>,
    ) -> Result<Self, SiteError> {
        let extents = request.extents(network)?;
        Ok(Self::new(request, extents))
    }

    pub fn extents(&self) -> WebMercatorExtents {
        self.extents
    }

    /// Number of pixel tasks, one per cell.
    pub fn task_count(&self) -> usize {
        self.extents.pixel_count()
    }

    /// Task for the cell at offset `(x, y)` from the northwest corner.
    pub fn task(&self, x: u32, y: u32) -> Result<PixelTask<'a>, SiteError> {
        if x >= self.extents.width || y >= self.extents.height {
            return Err(SiteError::PixelOutOfRange {
                x,
                y,
                width: self.extents.width,
                height: self.extents.height,
            });
        }
        debug!(job_id = %self.request.job_id(), x, y, "Generated static site task");
        Ok(PixelTask::new(self.request, x, y))
    }

    /// Task for the `task_number`-th cell in row-major order.
    pub fn task_by_number(&self, task_number: usize) -> Result<PixelTask<'a>, SiteError> {
        let total = self.task_count();
        if task_number >= total {
            return Err(SiteError::TaskNumberOutOfRange { task_number, total });
        }
        let width = self.extents.width as usize;
        self.task((task_number % width) as u32, (task_number / width) as u32)
    }

    /// Every task of the site, row by row from the northwest corner.
    pub fn tasks(&self) -> impl Iterator<Item = PixelTask<'a>> + '_ {
        let request = self.request;
        (0..self.extents.height).flat_map(move |y| {
            (0..self.extents.width).map(move |x| PixelTask::new(request, x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn nyc() -> GeoEnvelope {
        GeoEnvelope::new(-74.05, -73.75, 40.55, 40.90)
    }

    fn site() -> StaticSiteRequest {
        StaticSiteRequest::new("network-1", "v4.0.0", "analysis-sites", "nyc/2024")
    }

    #[test]
    fn test_two_by_two_site() {
        let request = site();
        let generator = PixelTaskGenerator::new(
            &request,
            WebMercatorExtents::new(9, 0, 0, 2, 2).unwrap(),
        );

        let tasks: Vec<_> = generator.tasks().collect();
        let ids: Vec<&str> = tasks.iter().map(|task| task.id()).collect();
        assert_eq!(ids, vec!["0_0", "1_0", "0_1", "1_1"]);
        assert!(tasks.iter().all(|task| task.job_id() == request.job_id()));
        assert!(tasks.iter().all(|task| task.kind() == "static"));
    }

    #[test]
    fn test_task_fields_come_from_parent() {
        let request = site().with_profile(serde_json::json!({"mode": "TRANSIT"}));
        let generator = PixelTaskGenerator::new(
            &request,
            WebMercatorExtents::new(9, 100, 100, 4, 3).unwrap(),
        );

        let task = generator.task(3, 2).unwrap();
        assert_eq!(task.x(), 3);
        assert_eq!(task.y(), 2);
        assert_eq!(task.id(), "3_2");
        assert_eq!(task.worker_version(), "v4.0.0");
        assert_eq!(task.transport_network_id(), "network-1");
        assert_eq!(task.profile()["mode"], "TRANSIT");
        assert!(std::ptr::eq(task.request(), &request));
    }

    #[test]
    fn test_task_out_of_range() {
        let request = site();
        let generator = PixelTaskGenerator::new(
            &request,
            WebMercatorExtents::new(9, 100, 100, 4, 3).unwrap(),
        );
        assert_eq!(
            generator.task(4, 0).unwrap_err(),
            SiteError::PixelOutOfRange {
                x: 4,
                y: 0,
                width: 4,
                height: 3
            }
        );
        assert!(generator.task(0, 3).is_err());
    }

    #[test]
    fn test_task_by_number_matches_iteration_order() {
        let request = site();
        let generator = PixelTaskGenerator::new(
            &request,
            WebMercatorExtents::new(9, 100, 100, 4, 3).unwrap(),
        );
        for (number, task) in generator.tasks().enumerate() {
            assert_eq!(generator.task_by_number(number).unwrap(), task);
        }
        assert_eq!(
            generator.task_by_number(12).unwrap_err(),
            SiteError::TaskNumberOutOfRange {
                task_number: 12,
                total: 12
            }
        );
    }

    #[test]
    fn test_ids_unique() {
        let request = site();
        let generator = PixelTaskGenerator::new(
            &request,
            WebMercatorExtents::new(9, 100, 100, 13, 11).unwrap(),
        );
        let ids: HashSet<String> = generator.tasks().map(|task| task.id().to_string()).collect();
        assert_eq!(ids.len(), generator.task_count());
        assert_eq!(ids.len(), 143);
    }

    #[test]
    fn test_extents_prefer_request_bounds() {
        let request = site().with_bounds(nyc());
        let other = GeoEnvelope::new(-1.0, 1.0, -1.0, 1.0);
        let extents = request.extents(Some(&other)).unwrap();
        assert_eq!(extents.west, 38575);
        assert_eq!(extents.north, 49190);
        assert_eq!(extents.width, 109);
        assert_eq!(extents.height, 168);
    }

    #[test]
    fn test_extents_fall_back_to_network() {
        let request = site();
        let extents = request.extents(Some(&nyc())).unwrap();
        assert_eq!(extents.west, 38575);
        assert_eq!(request.extents(None), Err(SiteError::MissingBounds));
    }

    #[test]
    fn test_for_request() {
        let request = site().with_zoom(10);
        let generator = PixelTaskGenerator::for_request(&request, Some(&nyc())).unwrap();
        assert_eq!(generator.extents().zoom, 10);
        assert_eq!(
            generator.task_count(),
            generator.extents().width as usize * generator.extents().height as usize
        );
    }

    #[test]
    fn test_job_id_generated_once() {
        let request = site();
        let copy = request.clone();
        assert_eq!(request.job_id(), copy.job_id());
        assert_ne!(request.job_id(), site().job_id());
    }

    #[test]
    fn test_deserialize_generates_job_id_and_defaults() {
        let request: StaticSiteRequest = serde_json::from_str(
            r#"{
                "transport_network_id": "network-1",
                "worker_version": "v4.0.0",
                "bucket": "analysis-sites",
                "prefix": "nyc"
            }"#,
        )
        .unwrap();
        assert_eq!(request.job_id().len(), 32);
        assert_eq!(request.zoom, DEFAULT_ZOOM);
        assert_eq!(request.bounds, None);
        assert!(request.request.is_null());
    }

    #[test]
    fn test_deserialize_keeps_existing_job_id() {
        let request: StaticSiteRequest = serde_json::from_str(
            r#"{
                "transport_network_id": "network-1",
                "worker_version": "v4.0.0",
                "bucket": "analysis-sites",
                "prefix": "nyc",
                "job_id": "abc123",
                "bounds": {"min_lon": -74.05, "max_lon": -73.75, "min_lat": 40.55, "max_lat": 40.9}
            }"#,
        )
        .unwrap();
        assert_eq!(request.job_id(), "abc123");
        assert_eq!(request.bounds, Some(nyc()));
    }
}
