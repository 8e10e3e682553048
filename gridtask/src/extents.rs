//! Pixel-space bounding rectangles.
//!
//! [`WebMercatorExtents`] describes a rectangle of whole pixels at one zoom
//! level, anchored at its northwest corner. It is the currency used to tell a
//! worker which part of the world it has to route over.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{lat_to_pixel, lon_to_pixel, world_pixels, CoordError, GeoEnvelope};
use crate::pointset::{PointSet, PointSetError};

/// Errors that can occur while building extents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtentsError {
    /// Envelope corner could not be projected.
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Envelope minimum lies east or south of its maximum.
    #[error("Inverted envelope: {0:?}")]
    InvertedEnvelope(GeoEnvelope),

    /// Rectangle reaches past the edge of the world.
    #[error("Extents {west},{north} +{width}x{height} exceed the {world} pixel world at zoom {zoom}")]
    OutsideWorld {
        zoom: u8,
        west: u32,
        north: u32,
        width: u32,
        height: u32,
        world: u32,
    },

    /// Extents at different zoom levels cannot be combined.
    #[error("Cannot combine extents at zoom {0} with extents at zoom {1}")]
    ZoomMismatch(u8, u8),
}

/// A rectangle of pixels at a single zoom level.
///
/// `west` and `north` are the absolute coordinates of the northwest pixel;
/// the rectangle covers `west..west + width` and `north..north + height`.
/// Deserialization goes through [`WebMercatorExtents::new`], so a decoded
/// value is as valid as a constructed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ExtentsFields")]
pub struct WebMercatorExtents {
    pub zoom: u8,
    pub west: u32,
    pub north: u32,
    pub width: u32,
    pub height: u32,
}

/// Unchecked wire form of [`WebMercatorExtents`].
#[derive(Deserialize)]
struct ExtentsFields {
    zoom: u8,
    west: u32,
    north: u32,
    width: u32,
    height: u32,
}

impl TryFrom<ExtentsFields> for WebMercatorExtents {
    type Error = ExtentsError;

    fn try_from(fields: ExtentsFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.zoom,
            fields.west,
            fields.north,
            fields.width,
            fields.height,
        )
    }
}

impl WebMercatorExtents {
    /// Creates extents, checking the zoom level and that the rectangle lies
    /// inside the world.
    pub fn new(
        zoom: u8,
        west: u32,
        north: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, ExtentsError> {
        let world = world_pixels(zoom)?;
        let fits = |start: u32, len: u32| start.checked_add(len).is_some_and(|end| end <= world);
        if !fits(west, width) || !fits(north, height) {
            return Err(ExtentsError::OutsideWorld {
                zoom,
                west,
                north,
                width,
                height,
                world,
            });
        }
        Ok(Self {
            zoom,
            west,
            north,
            width,
            height,
        })
    }

    /// Smallest extents containing every pixel touched by `envelope`.
    ///
    /// Unlike a grid derived from a network envelope, the pixels holding the
    /// eastern and southern edges are included, so no point on the boundary
    /// of the envelope falls outside the result.
    pub fn covering(envelope: &GeoEnvelope, zoom: u8) -> Result<Self, ExtentsError> {
        let west = lon_to_pixel(envelope.min_lon, zoom)?;
        let east = lon_to_pixel(envelope.max_lon, zoom)?;
        let north = lat_to_pixel(envelope.max_lat, zoom)?;
        let south = lat_to_pixel(envelope.min_lat, zoom)?;

        if east < west || south < north {
            return Err(ExtentsError::InvertedEnvelope(*envelope));
        }

        Self::new(zoom, west, north, east - west + 1, south - north + 1)
    }

    /// Exclusive eastern edge.
    pub fn east(&self) -> u32 {
        self.west + self.width
    }

    /// Exclusive southern edge.
    pub fn south(&self) -> u32 {
        self.north + self.height
    }

    /// Number of pixels in the rectangle.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the absolute pixel `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.west..self.east()).contains(&x) && (self.north..self.south()).contains(&y)
    }

    /// Smallest extents containing both rectangles.
    pub fn union(&self, other: &WebMercatorExtents) -> Result<Self, ExtentsError> {
        if self.zoom != other.zoom {
            return Err(ExtentsError::ZoomMismatch(self.zoom, other.zoom));
        }
        let west = self.west.min(other.west);
        let north = self.north.min(other.north);
        let east = self.east().max(other.east());
        let south = self.south().max(other.south());
        Ok(Self {
            zoom: self.zoom,
            west,
            north,
            width: east - west,
            height: south - north,
        })
    }

    /// Minimal extents at `zoom` covering the union of all point sets.
    ///
    /// Point sets without any features contribute nothing. Returns `None` if
    /// no point set contributes.
    pub fn for_point_sets(
        point_sets: &[Arc<dyn PointSet>],
        zoom: u8,
    ) -> Result<Option<Self>, PointSetError> {
        let mut combined: Option<Self> = None;
        for point_set in point_sets {
            let Some(extents) = point_set.extents_at(zoom)? else {
                continue;
            };
            combined = Some(match combined {
                Some(existing) => existing.union(&extents)?,
                None => extents,
            });
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{pixel_to_center_lat, pixel_to_center_lon, MAX_ZOOM};

    #[test]
    fn test_new_rejects_outside_world() {
        // Zoom 0 is a single 256 pixel tile
        assert!(WebMercatorExtents::new(0, 0, 0, 256, 256).is_ok());
        assert!(matches!(
            WebMercatorExtents::new(0, 200, 0, 57, 1),
            Err(ExtentsError::OutsideWorld { .. })
        ));
        assert!(matches!(
            WebMercatorExtents::new(0, u32::MAX, 0, 1, 1),
            Err(ExtentsError::OutsideWorld { .. })
        ));
    }

    #[test]
    fn test_new_rejects_bad_zoom() {
        assert_eq!(
            WebMercatorExtents::new(MAX_ZOOM + 1, 0, 0, 1, 1),
            Err(ExtentsError::Coord(CoordError::InvalidZoom(MAX_ZOOM + 1)))
        );
    }

    #[test]
    fn test_edges_and_contains() {
        let extents = WebMercatorExtents::new(9, 1000, 500, 10, 4).unwrap();
        assert_eq!(extents.east(), 1010);
        assert_eq!(extents.south(), 504);
        assert_eq!(extents.pixel_count(), 40);
        assert!(extents.contains(1000, 500));
        assert!(extents.contains(1009, 503));
        assert!(!extents.contains(1010, 503));
        assert!(!extents.contains(999, 500));
    }

    #[test]
    fn test_union() {
        let a = WebMercatorExtents::new(9, 100, 100, 10, 10).unwrap();
        let b = WebMercatorExtents::new(9, 105, 90, 20, 5).unwrap();
        let union = a.union(&b).unwrap();
        assert_eq!(union, WebMercatorExtents::new(9, 100, 90, 25, 20).unwrap());
        assert_eq!(b.union(&a).unwrap(), union);
    }

    #[test]
    fn test_union_zoom_mismatch() {
        let a = WebMercatorExtents::new(9, 0, 0, 1, 1).unwrap();
        let b = WebMercatorExtents::new(10, 0, 0, 1, 1).unwrap();
        assert_eq!(a.union(&b), Err(ExtentsError::ZoomMismatch(9, 10)));
    }

    #[test]
    fn test_covering_single_point() {
        let lat = pixel_to_center_lat(49280, 9).unwrap();
        let lon = pixel_to_center_lon(38591, 9).unwrap();
        let extents = WebMercatorExtents::covering(&GeoEnvelope::from_point(lat, lon), 9).unwrap();
        assert_eq!(extents, WebMercatorExtents::new(9, 38591, 49280, 1, 1).unwrap());
    }

    #[test]
    fn test_covering_includes_boundary_pixels() {
        let envelope = GeoEnvelope::new(-74.05, -73.75, 40.55, 40.90);
        let extents = WebMercatorExtents::covering(&envelope, 9).unwrap();
        assert_eq!(extents.west, 38575);
        assert_eq!(extents.north, 49190);
        assert_eq!(extents.east(), 38685);
        assert_eq!(extents.south(), 49359);
    }

    #[test]
    fn test_covering_inverted_envelope() {
        let envelope = GeoEnvelope::new(10.0, 5.0, 0.0, 1.0);
        assert!(matches!(
            WebMercatorExtents::covering(&envelope, 9),
            Err(ExtentsError::InvertedEnvelope(_))
        ));
    }

    #[test]
    fn test_serializes_with_plain_field_names() {
        let extents = WebMercatorExtents::new(9, 1, 2, 3, 4).unwrap();
        let json = serde_json::to_string(&extents).unwrap();
        assert_eq!(
            json,
            r#"{"zoom":9,"west":1,"north":2,"width":3,"height":4}"#
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let extents: WebMercatorExtents =
            serde_json::from_str(r#"{"zoom":9,"west":1,"north":2,"width":3,"height":4}"#).unwrap();
        assert_eq!(extents, WebMercatorExtents::new(9, 1, 2, 3, 4).unwrap());

        let err = serde_json::from_str::<WebMercatorExtents>(
            r#"{"zoom":24,"west":0,"north":0,"width":2,"height":2}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid zoom level: 24"));

        let err = serde_json::from_str::<WebMercatorExtents>(
            r#"{"zoom":0,"west":200,"north":0,"width":57,"height":1}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exceed the 256 pixel world"));
    }
}
