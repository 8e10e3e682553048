//! Read-only point collections used as analysis origins and destinations.
//!
//! The [`PointSet`] trait is the whole contract a worker relies on: how many
//! points there are, where each one is, and optionally what it is called.
//! Grid-backed sets compute positions on demand; sets loaded from external
//! datasets implement the same trait without sharing any state with grids.
//!
//! # Implementors
//!
//! - [`WebMercatorGridPointSet`] - every pixel of a Web Mercator rectangle
//!
//! # Example
//!
//! ```
//! use gridtask::pointset::{PointSet, WebMercatorGridPointSet};
//!
//! let grid = WebMercatorGridPointSet::new(9, 1000, 500, 10, 4).unwrap();
//! assert_eq!(grid.feature_count(), 40);
//! assert!(grid.get_lat(40).is_err());
//! ```

mod grid;

pub use grid::WebMercatorGridPointSet;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::coord::{CoordError, GeoEnvelope};
use crate::extents::{ExtentsError, WebMercatorExtents};

/// Errors that can occur when reading from or resolving point sets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointSetError {
    /// Index is not in `0..feature_count`.
    #[error("Point index {index} out of range (point set has {count} features)")]
    IndexOutOfRange { index: usize, count: usize },

    /// Coordinate conversion failed.
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Extents could not be derived.
    #[error(transparent)]
    Extents(#[from] ExtentsError),

    /// No point set is stored under the requested key.
    #[error("Unknown point set: {0}")]
    UnknownKey(String),
}

/// Checks that `index` addresses one of `count` features.
#[inline]
pub fn check_index(index: usize, count: usize) -> Result<(), PointSetError> {
    if index >= count {
        return Err(PointSetError::IndexOutOfRange { index, count });
    }
    Ok(())
}

/// A read-only, indexable collection of geographic points.
///
/// Implementations must be thread-safe (`Send + Sync`): one point set is
/// shared by every task of a job and read concurrently.
pub trait PointSet: Send + Sync + fmt::Debug {
    /// Number of points in the set.
    fn feature_count(&self) -> usize;

    /// Latitude in degrees of the point at `index`.
    fn get_lat(&self, index: usize) -> Result<f64, PointSetError>;

    /// Longitude in degrees of the point at `index`.
    fn get_lon(&self, index: usize) -> Result<f64, PointSetError>;

    /// Identifier of the point at `index`, if the set carries identifiers.
    fn get_id(&self, index: usize) -> Result<Option<String>, PointSetError> {
        check_index(index, self.feature_count())?;
        Ok(None)
    }

    /// Bounding envelope of every point, or `None` for an empty set.
    ///
    /// The default walks every point; implementations that know their bounds
    /// should override it.
    fn wgs84_bounds(&self) -> Result<Option<GeoEnvelope>, PointSetError> {
        let mut bounds: Option<GeoEnvelope> = None;
        for index in 0..self.feature_count() {
            let lat = self.get_lat(index)?;
            let lon = self.get_lon(index)?;
            match bounds.as_mut() {
                Some(envelope) => envelope.expand_to_include(lat, lon),
                None => bounds = Some(GeoEnvelope::from_point(lat, lon)),
            }
        }
        Ok(bounds)
    }

    /// Pixel rectangle at `zoom` containing every point, or `None` for an
    /// empty set.
    fn extents_at(&self, zoom: u8) -> Result<Option<WebMercatorExtents>, PointSetError> {
        match self.wgs84_bounds()? {
            Some(envelope) => Ok(Some(WebMercatorExtents::covering(&envelope, zoom)?)),
            None => Ok(None),
        }
    }
}

/// Resolves storage keys to loaded point sets.
///
/// This is the seam to whatever loads opportunity datasets and freeform
/// origin files; job submission only needs the lookup.
pub trait PointSetSource {
    /// Returns the point set stored under `key`.
    fn point_set(&self, key: &str) -> Result<Arc<dyn PointSet>, PointSetError>;
}

impl PointSetSource for HashMap<String, Arc<dyn PointSet>> {
    fn point_set(&self, key: &str) -> Result<Arc<dyn PointSet>, PointSetError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| PointSetError::UnknownKey(key.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory point set for exercising the trait's provided methods.

    use super::*;

    /// Freeform points with optional identifiers.
    #[derive(Debug, Clone, Default)]
    pub struct ListPointSet {
        pub points: Vec<(f64, f64)>,
        pub ids: Option<Vec<String>>,
    }

    impl ListPointSet {
        pub fn new(points: Vec<(f64, f64)>) -> Self {
            Self { points, ids: None }
        }

        pub fn with_ids(points: Vec<(f64, f64)>, ids: &[&str]) -> Self {
            Self {
                points,
                ids: Some(ids.iter().map(|id| id.to_string()).collect()),
            }
        }
    }

    impl PointSet for ListPointSet {
        fn feature_count(&self) -> usize {
            self.points.len()
        }

        fn get_lat(&self, index: usize) -> Result<f64, PointSetError> {
            check_index(index, self.points.len())?;
            Ok(self.points[index].0)
        }

        fn get_lon(&self, index: usize) -> Result<f64, PointSetError> {
            check_index(index, self.points.len())?;
            Ok(self.points[index].1)
        }

        fn get_id(&self, index: usize) -> Result<Option<String>, PointSetError> {
            check_index(index, self.points.len())?;
            Ok(self.ids.as_ref().map(|ids| ids[index].clone()))
        }
    }
}
