//! GridTask - task generation for regional accessibility analysis
//!
//! This library turns one analysis job into many independent per-origin tasks
//! that a worker pool can compute in any order:
//!
//! - [`coord`]: WGS84 to Web Mercator pixel conversion
//! - [`extents`]: pixel rectangles at a zoom level
//! - [`pointset`]: origin and destination collections, including implicit grids
//! - [`task`]: regional job templates and the tasks they specialize into
//! - [`site`]: per-pixel tasks for static site exports
//! - [`logging`]: tracing setup for binaries

pub mod coord;
pub mod extents;
pub mod logging;
pub mod pointset;
pub mod site;
pub mod task;
