//! Web Mercator grid point set.
//!
//! [`WebMercatorGridPointSet`] treats every pixel of a rectangular region as
//! one point without ever materializing the points. Point `i` is the pixel at
//! offset `(i % width, i / width)` from the northwest corner, so points run
//! west to east along a row and rows run north to south.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{check_index, PointSet, PointSetError};
use crate::coord::{lat_to_pixel, lon_to_pixel, pixel_to_lat, pixel_to_lon, GeoEnvelope};
use crate::coord::DEFAULT_ZOOM;
use crate::extents::{ExtentsError, WebMercatorExtents};

/// A point set whose points are the pixels of a Web Mercator rectangle.
///
/// Each point is located at the northwest corner of its pixel, matching how
/// the grid itself is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebMercatorGridPointSet {
    extents: WebMercatorExtents,
}

impl WebMercatorGridPointSet {
    /// Creates a grid from its pixel rectangle.
    ///
    /// # Arguments
    ///
    /// * `zoom` - Web Mercator zoom level
    /// * `west` - Absolute x of the westernmost pixel column
    /// * `north` - Absolute y of the northernmost pixel row
    /// * `width` - Number of pixel columns
    /// * `height` - Number of pixel rows
    pub fn new(
        zoom: u8,
        west: u32,
        north: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, PointSetError> {
        Ok(Self {
            extents: WebMercatorExtents::new(zoom, west, north, width, height)?,
        })
    }

    /// Lays a grid over a geographic envelope at the given zoom.
    ///
    /// The western and northern edges are the pixels holding the envelope's
    /// minimum longitude and maximum latitude; width and height are the pixel
    /// distance to the pixels holding the opposite edges.
    pub fn from_envelope(envelope: &GeoEnvelope, zoom: u8) -> Result<Self, PointSetError> {
        info!(
            zoom,
            min_lon = envelope.min_lon,
            max_lon = envelope.max_lon,
            min_lat = envelope.min_lat,
            max_lat = envelope.max_lat,
            "Creating web mercator grid for envelope"
        );

        let west = lon_to_pixel(envelope.min_lon, zoom)?;
        let east = lon_to_pixel(envelope.max_lon, zoom)?;
        let north = lat_to_pixel(envelope.max_lat, zoom)?;
        let south = lat_to_pixel(envelope.min_lat, zoom)?;

        if east < west || south < north {
            return Err(ExtentsError::InvertedEnvelope(*envelope).into());
        }

        Self::new(zoom, west, north, east - west, south - north)
    }

    /// Lays a grid at the default zoom over a street network's envelope.
    pub fn for_network(envelope: &GeoEnvelope) -> Result<Self, PointSetError> {
        Self::from_envelope(envelope, DEFAULT_ZOOM)
    }

    pub fn zoom(&self) -> u8 {
        self.extents.zoom
    }

    pub fn west(&self) -> u32 {
        self.extents.west
    }

    pub fn north(&self) -> u32 {
        self.extents.north
    }

    pub fn width(&self) -> u32 {
        self.extents.width
    }

    pub fn height(&self) -> u32 {
        self.extents.height
    }

    /// The grid's pixel rectangle.
    pub fn extents(&self) -> WebMercatorExtents {
        self.extents
    }

    /// Absolute pixel `(x, y)` of point `index`.
    pub fn pixel_of(&self, index: usize) -> Result<(u32, u32), PointSetError> {
        check_index(index, self.feature_count())?;
        let width = self.extents.width as usize;
        let x = (index % width) as u32;
        let y = (index / width) as u32;
        Ok((self.extents.west + x, self.extents.north + y))
    }

    /// Linear index of the point at offset `(x, y)` from the northwest
    /// corner, or `None` if the offset is outside the grid.
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.extents.width || y >= self.extents.height {
            return None;
        }
        Some(y as usize * self.extents.width as usize + x as usize)
    }
}

impl From<WebMercatorExtents> for WebMercatorGridPointSet {
    fn from(extents: WebMercatorExtents) -> Self {
        Self { extents }
    }
}

impl PointSet for WebMercatorGridPointSet {
    fn feature_count(&self) -> usize {
        self.extents.pixel_count()
    }

    fn get_lat(&self, index: usize) -> Result<f64, PointSetError> {
        let (_, y) = self.pixel_of(index)?;
        Ok(pixel_to_lat(y as f64, self.extents.zoom)?)
    }

    fn get_lon(&self, index: usize) -> Result<f64, PointSetError> {
        let (x, _) = self.pixel_of(index)?;
        Ok(pixel_to_lon(x as f64, self.extents.zoom)?)
    }

    fn wgs84_bounds(&self) -> Result<Option<GeoEnvelope>, PointSetError> {
        if self.extents.is_empty() {
            return Ok(None);
        }
        let zoom = self.extents.zoom;
        let last_x = self.extents.east() - 1;
        let last_y = self.extents.south() - 1;
        Ok(Some(GeoEnvelope::new(
            pixel_to_lon(self.extents.west as f64, zoom)?,
            pixel_to_lon(last_x as f64, zoom)?,
            pixel_to_lat(last_y as f64, zoom)?,
            pixel_to_lat(self.extents.north as f64, zoom)?,
        )))
    }

    fn extents_at(&self, zoom: u8) -> Result<Option<WebMercatorExtents>, PointSetError> {
        if self.extents.is_empty() {
            return Ok(None);
        }
        if zoom == self.extents.zoom {
            return Ok(Some(self.extents));
        }
        match self.wgs84_bounds()? {
            Some(envelope) => Ok(Some(WebMercatorExtents::covering(&envelope, zoom)?)),
            None => Ok(None),
        }
    }
}
