//! Coordinate type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Supported zoom levels. At zoom 23 the world is 2^31 pixels wide, the
/// largest size that still fits a `u32` pixel coordinate with room to add.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 23;

/// Zoom level used for analysis grids unless a job overrides it.
pub const DEFAULT_ZOOM: u8 = 9;

/// Pixels along one edge of a Web Mercator tile.
pub const TILE_SIZE: u32 = 256;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Absolute pixel position in the Web Mercator world at a given zoom.
///
/// `x` increases eastward from the antimeridian, `y` increases southward
/// from the northern edge of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

/// Geographic bounding box in WGS84 degrees.
///
/// This is the envelope handed over by whatever loaded the street network or
/// point data; it is only ever read, never projected in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoEnvelope {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoEnvelope {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Degenerate envelope containing a single point.
    pub fn from_point(lat: f64, lon: f64) -> Self {
        Self::new(lon, lon, lat, lat)
    }

    /// Grows the envelope to contain the given point.
    pub fn expand_to_include(&mut self, lat: f64, lon: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
    }

    /// Smallest envelope containing both `self` and `other`.
    pub fn union(&self, other: &GeoEnvelope) -> GeoEnvelope {
        GeoEnvelope {
            min_lon: self.min_lon.min(other.min_lon),
            max_lon: self.max_lon.max(other.max_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside the Web Mercator band or not finite
    #[error("Invalid latitude: {0} (must be between -85.05112878 and 85.05112878)")]
    InvalidLatitude(f64),

    /// Longitude is outside -180..=180 or not finite
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    /// Zoom level is above the supported maximum
    #[error("Invalid zoom level: {0} (must be between 0 and 23)")]
    InvalidZoom(u8),
}
