//! Grid inspection command.
//!
//! Shows the pixel grid a bounding box maps to, the way a network's analysis
//! grid or a destination set's extents would be derived from it.

use std::io::Write;

use clap::Args;
use serde_json::json;

use gridtask::coord::{pixel_size_degrees, DEFAULT_ZOOM};
use gridtask::extents::WebMercatorExtents;
use gridtask::pointset::{PointSet, PointSetError, WebMercatorGridPointSet};

use super::common::{print_json_line, BoundsArgs};
use crate::error::CliError;

/// Arguments for the `grid` command.
#[derive(Debug, Args)]
pub struct GridArgs {
    #[command(flatten)]
    pub bounds: BoundsArgs,

    /// Web Mercator zoom level
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Include the pixels holding the eastern and southern edges, as
    /// destination extents do
    #[arg(long)]
    pub covering: bool,
}

/// Run the grid command.
pub fn run(args: &GridArgs, out: &mut impl Write) -> Result<(), CliError> {
    let envelope = args.bounds.envelope();
    let grid = if args.covering {
        let extents = WebMercatorExtents::covering(&envelope, args.zoom)
            .map_err(PointSetError::from)?;
        WebMercatorGridPointSet::from(extents)
    } else {
        WebMercatorGridPointSet::from_envelope(&envelope, args.zoom)?
    };

    let bounds = grid.wgs84_bounds()?;
    let pixel_size = pixel_size_degrees(grid.zoom()).map_err(PointSetError::from)?;
    print_json_line(
        out,
        &json!({
            "extents": grid.extents(),
            "points": grid.feature_count(),
            "pixel_size_degrees": pixel_size,
            "bounds": bounds,
        }),
    )
}
