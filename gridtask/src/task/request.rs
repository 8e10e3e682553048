//! Job submission document.
//!
//! A [`RegionalJobRequest`] is what arrives from the analysis front end. It
//! refers to point sets by storage key and may carry grid fields; it becomes a
//! [`RegionalTaskTemplate`](super::RegionalTaskTemplate) only after
//! validation.
//!
//! # Example
//!
//! ```
//! use gridtask::task::RegionalJobRequest;
//!
//! let request: RegionalJobRequest = serde_json::from_str(r#"{
//!     "job_id": "job-1",
//!     "west": 1000, "north": 500, "width": 10, "height": 4,
//!     "destination_point_set_keys": ["region/jobs.grid"],
//!     "record_accessibility": true
//! }"#).unwrap();
//!
//! assert_eq!(request.zoom, 9);
//! assert_eq!(request.grid_origins().unwrap(), Some((1000, 500, 10, 4)));
//! ```

use serde::{Deserialize, Serialize};

use super::{new_job_id, TemplateError};
use crate::coord::DEFAULT_ZOOM;

/// Serialized description of a regional analysis job.
///
/// `job_id` is required so that every parse of the same document names the
/// same job. Other absent fields take their defaults: zoom 9, no origins or
/// destinations, all flags off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalJobRequest {
    /// Identifier shared by every task of the job.
    pub job_id: String,

    /// Web Mercator zoom level of the origin grid and destination extents.
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Westernmost pixel of the origin grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub west: Option<u32>,

    /// Northernmost pixel of the origin grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub north: Option<u32>,

    /// Origin grid width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Origin grid height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Storage key of freeform origins (e.g. `regionId/datasetId.pointset`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_point_set_key: Option<String>,

    /// Storage keys of the destination point sets.
    #[serde(default)]
    pub destination_point_set_keys: Vec<String>,

    /// Pair origin `i` only with destination `i`.
    #[serde(default)]
    pub one_to_one: bool,

    /// Record travel times from each origin.
    #[serde(default)]
    pub record_times: bool,

    /// Record cumulative accessibility for each origin.
    #[serde(default)]
    pub record_accessibility: bool,

    /// Bake a static site: the grid is both origins and destinations.
    #[serde(default)]
    pub make_taui_site: bool,
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

/// A request with a fresh job id and every other field at its default.
impl Default for RegionalJobRequest {
    fn default() -> Self {
        Self {
            job_id: new_job_id(),
            zoom: DEFAULT_ZOOM,
            west: None,
            north: None,
            width: None,
            height: None,
            origin_point_set_key: None,
            destination_point_set_keys: Vec::new(),
            one_to_one: false,
            record_times: false,
            record_accessibility: false,
            make_taui_site: false,
        }
    }
}

impl RegionalJobRequest {
    /// Grid origin fields as `(west, north, width, height)`.
    ///
    /// Returns `None` when no grid field is set and an error when only some
    /// of them are.
    pub fn grid_origins(&self) -> Result<Option<(u32, u32, u32, u32)>, TemplateError> {
        match (self.west, self.north, self.width, self.height) {
            (Some(west), Some(north), Some(width), Some(height)) => {
                Ok(Some((west, north, width, height)))
            }
            (None, None, None, None) => Ok(None),
            (None, ..) => Err(TemplateError::IncompleteGrid("west")),
            (_, None, ..) => Err(TemplateError::IncompleteGrid("north")),
            (_, _, None, _) => Err(TemplateError::IncompleteGrid("width")),
            (.., None) => Err(TemplateError::IncompleteGrid("height")),
        }
    }
}
