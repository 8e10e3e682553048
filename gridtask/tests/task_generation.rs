//! Integration tests for regional and static site task generation.
//!
//! These tests drive the public API end to end:
//! - Job request JSON → template → tasks
//! - Grid derivation for a real city envelope
//! - Concurrent, repeatable task specialization
//!
//! Run with: `cargo test --test task_generation`

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use rand::Rng;

use gridtask::coord::{pixel_to_center_lat, pixel_to_center_lon, GeoEnvelope};
use gridtask::extents::WebMercatorExtents;
use gridtask::pointset::{PointSet, PointSetError, WebMercatorGridPointSet};
use gridtask::site::{PixelTaskGenerator, StaticSiteRequest};
use gridtask::task::{RegionalJobRequest, RegionalTaskTemplate, TemplateError};

// ============================================================================
// Helper Functions
// ============================================================================

/// Envelope around New York City.
fn nyc() -> GeoEnvelope {
    GeoEnvelope::new(-74.05, -73.75, 40.55, 40.90)
}

/// Point set source holding a single opportunity grid.
fn source(key: &str, grid: WebMercatorGridPointSet) -> HashMap<String, Arc<dyn PointSet>> {
    let mut sets: HashMap<String, Arc<dyn PointSet>> = HashMap::new();
    sets.insert(key.to_string(), Arc::new(grid));
    sets
}

/// Freeform origins for one-to-one jobs.
#[derive(Debug)]
struct Stops(Vec<(&'static str, f64, f64)>);

impl PointSet for Stops {
    fn feature_count(&self) -> usize {
        self.0.len()
    }

    fn get_lat(&self, index: usize) -> Result<f64, PointSetError> {
        gridtask::pointset::check_index(index, self.0.len())?;
        Ok(self.0[index].1)
    }

    fn get_lon(&self, index: usize) -> Result<f64, PointSetError> {
        gridtask::pointset::check_index(index, self.0.len())?;
        Ok(self.0[index].2)
    }

    fn get_id(&self, index: usize) -> Result<Option<String>, PointSetError> {
        gridtask::pointset::check_index(index, self.0.len())?;
        Ok(Some(self.0[index].0.to_string()))
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

/// The NYC envelope yields a 109 x 168 grid at zoom 9 in row-major order.
#[test]
fn test_city_grid_from_envelope() {
    let grid = WebMercatorGridPointSet::from_envelope(&nyc(), 9).unwrap();

    assert_eq!(grid.west(), 38575);
    assert_eq!(grid.north(), 49190);
    assert_eq!(grid.width(), 109);
    assert_eq!(grid.height(), 168);
    assert_eq!(grid.feature_count(), 109 * 168);

    // Index 109 starts the second row
    assert_eq!(grid.pixel_of(109).unwrap(), (38575, 49191));
    assert_eq!(grid.index_of(0, 1), Some(109));
}

/// A job submitted as JSON resolves its keys and specializes by pixel center.
#[test]
fn test_grid_job_from_json() {
    let request: RegionalJobRequest = serde_json::from_str(
        r#"{
            "job_id": "nyc-jobs",
            "west": 1000, "north": 500, "width": 10, "height": 4,
            "destination_point_set_keys": ["nyc/jobs.grid"],
            "record_accessibility": true
        }"#,
    )
    .unwrap();
    let opportunities = WebMercatorGridPointSet::new(9, 990, 495, 30, 20).unwrap();
    let template =
        RegionalTaskTemplate::from_request(&request, &source("nyc/jobs.grid", opportunities))
            .unwrap();

    assert_eq!(template.n_tasks_total(), 40);
    assert_eq!(template.n_targets_per_origin(), 600);
    assert_eq!(template.web_mercator_extents(), opportunities.extents());

    let task = template.make_one_task(23).unwrap();
    assert_eq!(task.job_id(), "nyc-jobs");
    assert_eq!(task.from_lon(), pixel_to_center_lon(1003, 9).unwrap());
    assert_eq!(task.from_lat(), pixel_to_center_lat(502, 9).unwrap());
    assert_eq!(task.origin_id(), None);
}

#[test]
fn test_unknown_destination_key_rejected() {
    let request = RegionalJobRequest {
        west: Some(1000),
        north: Some(500),
        width: Some(10),
        height: Some(4),
        destination_point_set_keys: vec!["missing".to_string()],
        ..Default::default()
    };
    let opportunities = WebMercatorGridPointSet::new(9, 990, 495, 30, 20).unwrap();

    let err = RegionalTaskTemplate::from_request(&request, &source("other", opportunities))
        .unwrap_err();
    assert_eq!(
        err,
        TemplateError::PointSet(PointSetError::UnknownKey("missing".to_string()))
    );
}

/// Freeform one-to-one jobs carry origin ids and route to one target each.
#[test]
fn test_one_to_one_freeform_job() {
    let stops: Arc<dyn PointSet> = Arc::new(Stops(vec![
        ("times-square", 40.758, -73.9855),
        ("union-square", 40.7359, -73.9911),
    ]));
    let destinations: Arc<dyn PointSet> = Arc::new(Stops(vec![
        ("work-a", 40.7128, -74.006),
        ("work-b", 40.7484, -73.9857),
    ]));

    let template = RegionalTaskTemplate::builder("commutes")
        .origin_point_set(stops)
        .destination(destinations)
        .one_to_one(true)
        .record_times(true)
        .build()
        .unwrap();

    assert_eq!(template.n_tasks_total(), 2);
    assert_eq!(template.n_targets_per_origin(), 1);

    let task = template.make_one_task(1).unwrap();
    assert_eq!(task.origin_id(), Some("union-square"));
    assert_eq!(task.from_lat(), 40.7359);
    assert_eq!(task.from_lon(), -73.9911);

    let extents = template.web_mercator_extents();
    assert!(!extents.is_empty());
    assert!(extents.contains(
        gridtask::coord::lon_to_pixel(-74.006, 9).unwrap(),
        gridtask::coord::lat_to_pixel(40.7128, 9).unwrap()
    ));
}

/// Specialization is repeatable from any thread.
#[test]
fn test_tasks_identical_across_threads() {
    let template = RegionalTaskTemplate::builder("threads")
        .grid_origins(38575, 49190, 109, 168)
        .make_taui_site(true)
        .build()
        .unwrap();

    let total = template.n_tasks_total();
    let mut rng = rand::rng();
    let mut sample: Vec<usize> = (0..64).map(|_| rng.random_range(0..total)).collect();
    sample.extend([0, 1, 108, 109, total - 1]);
    let expected: Vec<_> = sample
        .iter()
        .map(|&n| template.make_one_task(n).unwrap())
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let template = Arc::clone(&template);
            let sample = sample.clone();
            thread::spawn(move || {
                sample
                    .iter()
                    .rev()
                    .map(|&n| template.make_one_task(n).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let mut tasks = handle.join().unwrap();
        tasks.reverse();
        assert_eq!(tasks, expected);
    }
}

#[test]
fn test_parallel_generation_matches_sequential() {
    let template = RegionalTaskTemplate::builder("parallel")
        .grid_origins(38575, 49190, 109, 168)
        .make_taui_site(true)
        .build()
        .unwrap();

    let sequential: Vec<_> = template
        .make_tasks(0..2000)
        .collect::<Result<_, _>>()
        .unwrap();
    let parallel = template.par_make_tasks(0..2000).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(template.n_targets_per_origin(), 109 * 168);
}

/// Job extents cover every destination set at the job zoom.
#[test]
fn test_extents_union_of_destinations() {
    let west = WebMercatorGridPointSet::new(9, 100, 100, 10, 10).unwrap();
    let east = WebMercatorGridPointSet::new(9, 150, 120, 10, 10).unwrap();

    let template = RegionalTaskTemplate::builder("two-regions")
        .grid_origins(100, 100, 2, 2)
        .destination(Arc::new(west))
        .destination(Arc::new(east))
        .build()
        .unwrap();

    assert_eq!(
        template.web_mercator_extents(),
        WebMercatorExtents::new(9, 100, 100, 60, 30).unwrap()
    );
}

/// Every pixel of a static site gets one task sharing the parent's job id.
#[test]
fn test_static_site_tasks() {
    let request = StaticSiteRequest::new("network-1", "v4.0.0", "sites", "nyc")
        .with_bounds(nyc())
        .with_profile(serde_json::json!({"mode": "WALK"}));
    let generator = PixelTaskGenerator::for_request(&request, None).unwrap();

    assert_eq!(generator.task_count(), 109 * 168);

    let ids: Vec<String> = generator
        .tasks()
        .take(3)
        .map(|task| task.id().to_string())
        .collect();
    assert_eq!(ids, vec!["0_0", "1_0", "2_0"]);

    let last = generator.task_by_number(generator.task_count() - 1).unwrap();
    assert_eq!(last.id(), "108_167");
    assert_eq!(last.job_id(), request.job_id());
    assert_eq!(last.profile()["mode"], "WALK");
}
