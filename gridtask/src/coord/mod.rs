//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and absolute Web Mercator pixel coordinates. At zoom `z` the world is
//! `256 * 2^z` pixels along each axis; longitude maps linearly onto the x
//! axis and latitude through the spherical Mercator transform onto the y axis.
//!
//! Inputs outside the projection are rejected rather than clamped. The closed
//! eastern and southern edges (longitude 180, latitude [`MIN_LAT`]) map onto
//! the last pixel so every accepted input yields a pixel inside the world.

mod types;

pub use types::{
    CoordError, GeoCoord, GeoEnvelope, PixelCoord, DEFAULT_ZOOM, MAX_LAT, MAX_LON, MAX_ZOOM,
    MIN_LAT, MIN_LON, MIN_ZOOM, TILE_SIZE,
};

use std::f64::consts::PI;

/// Number of pixels along one axis of the world at the given zoom.
#[inline]
pub fn world_pixels(zoom: u8) -> Result<u32, CoordError> {
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    Ok(TILE_SIZE << zoom)
}

/// Angular width of one pixel in degrees of longitude.
#[inline]
pub fn pixel_size_degrees(zoom: u8) -> Result<f64, CoordError> {
    Ok(360.0 / world_pixels(zoom)? as f64)
}

/// Converts a longitude to the x coordinate of the pixel containing it.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 23)
#[inline]
pub fn lon_to_pixel(lon: f64, zoom: u8) -> Result<u32, CoordError> {
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }

    let n = world_pixels(zoom)? as f64;
    let x = ((lon + 180.0) / 360.0 * n).floor();
    Ok(x.clamp(0.0, n - 1.0) as u32)
}

/// Converts a latitude to the y coordinate of the pixel containing it.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `zoom` - Zoom level (0 to 23)
#[inline]
pub fn lat_to_pixel(lat: f64, zoom: u8) -> Result<u32, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }

    let n = world_pixels(zoom)? as f64;
    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();
    // MIN_LAT/MAX_LAT are rounded slightly past the true projection bound
    Ok(y.clamp(0.0, n - 1.0) as u32)
}

/// Converts geographic coordinates to an absolute pixel.
pub fn to_pixel_coords(lat: f64, lon: f64, zoom: u8) -> Result<PixelCoord, CoordError> {
    Ok(PixelCoord {
        x: lon_to_pixel(lon, zoom)?,
        y: lat_to_pixel(lat, zoom)?,
        zoom,
    })
}

/// Longitude of a (possibly fractional) pixel x coordinate.
///
/// Integer inputs give the western edge of that pixel.
#[inline]
pub fn pixel_to_lon(x: f64, zoom: u8) -> Result<f64, CoordError> {
    Ok(x / world_pixels(zoom)? as f64 * 360.0 - 180.0)
}

/// Latitude of a (possibly fractional) pixel y coordinate.
///
/// Integer inputs give the northern edge of that pixel.
#[inline]
pub fn pixel_to_lat(y: f64, zoom: u8) -> Result<f64, CoordError> {
    let n = world_pixels(zoom)? as f64;
    let lat_rad = (PI * (1.0 - 2.0 * y / n)).sinh().atan();
    Ok(lat_rad.to_degrees())
}

/// Longitude of the center of pixel column `x`.
#[inline]
pub fn pixel_to_center_lon(x: u32, zoom: u8) -> Result<f64, CoordError> {
    pixel_to_lon(x as f64 + 0.5, zoom)
}

/// Latitude of the center of pixel row `y`.
#[inline]
pub fn pixel_to_center_lat(y: u32, zoom: u8) -> Result<f64, CoordError> {
    pixel_to_lat(y as f64 + 0.5, zoom)
}

impl PixelCoord {
    /// Geographic position of this pixel's center.
    pub fn center(&self) -> Result<GeoCoord, CoordError> {
        Ok(GeoCoord {
            lat: pixel_to_center_lat(self.y, self.zoom)?,
            lon: pixel_to_center_lon(self.x, self.zoom)?,
        })
    }

    /// Geographic position of this pixel's northwest corner.
    pub fn northwest_corner(&self) -> Result<GeoCoord, CoordError> {
        Ok(GeoCoord {
            lat: pixel_to_lat(self.y as f64, self.zoom)?,
            lon: pixel_to_lon(self.x as f64, self.zoom)?,
        })
    }
}
