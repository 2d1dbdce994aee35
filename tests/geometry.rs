use trailgeo::error::GeoError;
use trailgeo::pipeline::chart::sample_chart;
use trailgeo::pipeline::densify::{
    backfill_elevation, densify, path_between_markers, segment_steps, DensifyOptions,
    TerrainVariation,
};
use trailgeo::pipeline::distance::{haversine_distance, haversine_miles};
use trailgeo::pipeline::metrics::{
    assess_quality, cumulative_distances, points_per_mile, straightness, total_distance,
};
use trailgeo::types::geo::GeoPoint;
use trailgeo::types::quality::DensityClass;

fn zigzag(count: usize) -> Vec<GeoPoint> {
    (0..count)
        .map(|i| {
            GeoPoint::with_elevation(
                37.0 + i as f64 * 0.0001,
                -119.0 + (i % 2) as f64 * 0.0002,
                4000.0 + i as f64 * 10.0,
            )
        })
        .collect()
}

fn yosemite_pair() -> Vec<GeoPoint> {
    vec![
        GeoPoint::with_elevation(37.74, -119.60, 4000.0),
        GeoPoint::with_elevation(37.75, -119.55, 4600.0),
    ]
}

#[test]
fn distance_to_self_is_zero() {
    let p = GeoPoint::new(44.27, -71.30);
    assert_eq!(haversine_miles(&p, &p), 0.0);
}

#[test]
fn distance_is_symmetric() {
    let a = GeoPoint::new(36.578, -118.292);
    let b = GeoPoint::new(37.745, -119.533);
    let ab = haversine_miles(&a, &b);
    let ba = haversine_miles(&b, &a);
    assert!((ab - ba).abs() < 1e-9);
}

#[test]
fn one_degree_of_latitude_is_about_69_miles() {
    let d = haversine_distance(40.0, -105.0, 41.0, -105.0);
    assert!((d - 69.09).abs() < 0.05, "got {d}");
}

#[test]
fn total_distance_ignores_direction() {
    let path = zigzag(25);
    let mut reversed = path.clone();
    reversed.reverse();
    assert!((total_distance(&path) - total_distance(&reversed)).abs() < 1e-9);
}

#[test]
fn degenerate_paths_have_zero_distance() {
    assert_eq!(total_distance(&[]), 0.0);
    assert_eq!(total_distance(&[GeoPoint::new(1.0, 2.0)]), 0.0);
}

#[test]
fn cumulative_distances_never_decrease() {
    let path = zigzag(30);
    let distances = cumulative_distances(&path);
    assert_eq!(distances.len(), path.len());
    assert_eq!(distances[0], 0.0);
    assert!(distances.windows(2).all(|w| w[1] >= w[0]));
    assert!((distances[distances.len() - 1] - total_distance(&path)).abs() < 1e-9);
}

#[test]
fn zero_distance_density_is_flagged() {
    let density = points_per_mile(12, 0.0);
    assert_eq!(density.points_per_mile, 0.0);
    assert!(density.zero_distance);

    let density = points_per_mile(30, 2.0);
    assert_eq!(density.points_per_mile, 15.0);
    assert!(!density.zero_distance);
}

#[test]
fn density_bands() {
    assert_eq!(DensityClass::classify(20.0), DensityClass::Good);
    assert_eq!(DensityClass::classify(15.0), DensityClass::Good);
    assert_eq!(DensityClass::classify(10.0), DensityClass::Fair);
    assert_eq!(DensityClass::classify(8.0), DensityClass::Fair);
    assert_eq!(DensityClass::classify(7.99), DensityClass::Poor);
    assert_eq!(DensityClass::classify(5.0), DensityClass::Poor);
}

#[test]
fn straightness_needs_three_points() {
    assert_eq!(straightness(&yosemite_pair()), None);

    let line = path_between_markers(
        &GeoPoint::new(37.74, -119.60),
        &GeoPoint::new(37.75, -119.55),
        10,
        4000.0,
        500.0,
    );
    let ratio = straightness(&line).expect("ratio");
    assert!(ratio > 0.99);

    let ratio = straightness(&zigzag(40)).expect("ratio");
    assert!(ratio < 0.9, "zigzag ratio {ratio}");
}

#[test]
fn complete_path_scores_100() {
    let path = zigzag(40);
    let assessment = assess_quality(&path, total_distance(&path), 10, true);
    assert_eq!(assessment.quality, DensityClass::Good);
    assert!(assessment.has_elevation);
    assert!(assessment.issues.is_empty());
    assert!(assessment.warnings.is_empty(), "{:?}", assessment.warnings);
    assert_eq!(assessment.score, 100);
}

#[test]
fn deductions_stack() {
    let mut path = zigzag(40);
    path[3].elevation = None;
    // 40 points over a distance that makes the density FAIR.
    let assessment = assess_quality(&path, 40.0 / 10.0, 3, false);
    assert_eq!(assessment.quality, DensityClass::Fair);
    // -20 fair, -30 elevation, -5 sparse chart, -5 markers
    assert_eq!(assessment.score, 40);
    assert!(!assessment.has_elevation);
}

#[test]
fn straight_line_is_penalised() {
    let line = path_between_markers(
        &GeoPoint::new(37.74, -119.60),
        &GeoPoint::new(37.75, -119.55),
        100,
        4000.0,
        500.0,
    );
    let assessment = assess_quality(&line, 0.0, 15, true);
    assert_eq!(assessment.quality, DensityClass::Good);
    assert_eq!(assessment.score, 90);
    assert!(assessment
        .warnings
        .iter()
        .any(|w| w.starts_with("Path very straight")));
    assert!(assessment
        .warnings
        .iter()
        .any(|w| w.starts_with("No distance in stats")));
}

#[test]
fn empty_path_is_poor_without_panicking() {
    let assessment = assess_quality(&[], 0.0, 0, false);
    assert_eq!(assessment.distance_mi, 0.0);
    assert_eq!(assessment.points_per_mile, 0.0);
    assert_eq!(assessment.quality, DensityClass::Poor);
    assert!(assessment.score <= 100);
    assert_eq!(assessment.score, 45);
    assert!(assessment.warnings.iter().any(|w| w == "Trail distance is 0"));
}

#[test]
fn worst_case_path_keeps_a_positive_score() {
    let path = vec![GeoPoint::new(37.0, -119.0), GeoPoint::new(37.5, -119.0)];
    let assessment = assess_quality(&path, 0.0, 0, false);
    // -40 -30 -10 -5
    assert_eq!(assessment.score, 15);

    let assessment = assess_quality(&path, 0.0, 2, false);
    assert_eq!(assessment.score, 20);
}

#[test]
fn short_segment_gets_at_least_the_target_density() {
    let path = yosemite_pair();
    let segment = haversine_miles(&path[0], &path[1]);
    let options = DensifyOptions {
        target_points_per_mile: 20.0,
        min_points_per_segment: 0,
        variation: TerrainVariation::default(),
    };
    let steps = segment_steps(segment, &options);
    assert!(steps >= 14);
    assert!(steps as f64 >= segment * 20.0);
}

#[test]
fn floor_applies_to_tiny_segments() {
    let options = DensifyOptions {
        target_points_per_mile: 20.0,
        min_points_per_segment: 15,
        variation: TerrainVariation::default(),
    };
    assert_eq!(segment_steps(0.01, &options), 15);
    assert_eq!(segment_steps(0.0, &options), 15);

    let no_floor = DensifyOptions {
        min_points_per_segment: 0,
        ..options
    };
    assert_eq!(segment_steps(0.0, &no_floor), 1);
}

#[test]
fn densified_path_meets_target_density() {
    let path = vec![
        GeoPoint::with_elevation(37.74, -119.60, 4000.0),
        GeoPoint::with_elevation(37.75, -119.55, 4600.0),
        GeoPoint::with_elevation(37.77, -119.53, 5200.0),
    ];
    let options = DensifyOptions {
        target_points_per_mile: 20.0,
        min_points_per_segment: 1,
        variation: TerrainVariation::default(),
    };
    let dense = densify(&path, &options).expect("densify");
    let density = points_per_mile(dense.len(), total_distance(&dense));
    assert!(density.points_per_mile >= 20.0, "{}", density.points_per_mile);
}

#[test]
fn densify_respects_floor_and_keeps_endpoints() {
    let path = vec![
        GeoPoint::with_elevation(44.2700, -71.3000, 2000.0),
        GeoPoint::with_elevation(44.2710, -71.3010, 2100.0),
        GeoPoint::with_elevation(44.2720, -71.3005, 2300.0),
    ];
    let options = DensifyOptions::default();
    let dense = densify(&path, &options).expect("densify");

    let segments = path.len() - 1;
    assert!(dense.len() >= segments * options.min_points_per_segment);
    assert_eq!(dense.first(), path.first());
    assert_eq!(dense.last(), path.last());
    assert!(dense.windows(2).all(|w| w[0] != w[1]), "duplicate boundary vertex");
    // both segments are far shorter than a mile, so each gets exactly the floor
    assert_eq!(dense.len(), 2 * 15 + 1);
    assert_eq!(dense[15], path[1]);
}

#[test]
fn elevation_is_blended_linearly_without_variation() {
    let options = DensifyOptions {
        target_points_per_mile: 0.0,
        min_points_per_segment: 4,
        variation: TerrainVariation::default(),
    };
    let dense = densify(&yosemite_pair(), &options).expect("densify");
    let elevations: Vec<f64> = dense.iter().map(|p| p.elevation.expect("ele")).collect();
    assert_eq!(elevations, vec![4000.0, 4150.0, 4300.0, 4450.0, 4600.0]);
}

#[test]
fn terrain_variation_is_superimposed() {
    let options = DensifyOptions {
        target_points_per_mile: 0.0,
        min_points_per_segment: 6,
        variation: TerrainVariation {
            amplitude_ft: 50.0,
            cycles: 3.0,
        },
    };
    let dense = densify(&yosemite_pair(), &options).expect("densify");
    let at_sixth = dense[1].elevation.expect("ele");
    assert!((at_sixth - (4100.0 + 50.0)).abs() < 1e-6, "got {at_sixth}");
    assert!(dense
        .iter()
        .all(|p| p.elevation.expect("ele") <= 4600.0 + 50.0 + 1e-9));
}

#[test]
fn densify_rejects_degenerate_input() {
    let options = DensifyOptions::default();
    assert_eq!(densify(&[], &options), Err(GeoError::InsufficientPoints(0)));
    assert_eq!(
        densify(&[GeoPoint::with_elevation(1.0, 1.0, 1.0)], &options),
        Err(GeoError::InsufficientPoints(1))
    );

    let mut path = yosemite_pair();
    path[1].elevation = None;
    assert_eq!(
        densify(&path, &options),
        Err(GeoError::MissingElevation { index: 1 })
    );
}

#[test]
fn backfill_keeps_measured_elevations() {
    let mut path = vec![
        GeoPoint::new(37.0, -119.0),
        GeoPoint::with_elevation(37.1, -119.0, 5000.0),
        GeoPoint::new(37.2, -119.0),
    ];
    backfill_elevation(&mut path, 4000.0, 1000.0);
    let elevations: Vec<_> = path.iter().map(|p| p.elevation).collect();
    assert_eq!(elevations, vec![Some(4000.0), Some(5000.0), Some(5000.0)]);

    let mut single = vec![GeoPoint::new(37.0, -119.0)];
    backfill_elevation(&mut single, 4000.0, 1000.0);
    assert_eq!(single[0].elevation, Some(4000.0));
}

#[test]
fn marker_path_climbs_with_easing() {
    let path = path_between_markers(
        &GeoPoint::new(37.0, -119.0),
        &GeoPoint::new(37.02, -119.0),
        10,
        4000.0,
        1000.0,
    );
    assert_eq!(path.len(), 11);
    assert_eq!(path[0].elevation, Some(4000.0));
    assert!((path[10].elevation.expect("ele") - 5000.0).abs() < 1e-9);
    // eased: the first half gains more than half the climb
    assert!(path[5].elevation.expect("ele") > 4500.0);
}

#[test]
fn chart_has_exactly_n_points_spanning_the_path() {
    let options = DensifyOptions::default();
    let dense = densify(&yosemite_pair(), &options).expect("densify");
    let total = total_distance(&dense);

    let chart = sample_chart(&dense, 15).expect("chart");
    assert_eq!(chart.len(), 15);
    assert_eq!(chart[0].distance, 0.0);
    assert!((chart[14].distance - total).abs() <= 0.01);
    assert!(chart.windows(2).all(|w| w[1].distance >= w[0].distance));
    assert!(chart.iter().all(|c| c.distance >= 0.0 && c.distance <= total + 0.005));
}

#[test]
fn chart_takes_nearest_vertex_elevation() {
    let path = vec![
        GeoPoint::with_elevation(37.00, -119.0, 100.0),
        GeoPoint::with_elevation(37.01, -119.0, 200.0),
        GeoPoint::with_elevation(37.02, -119.0, 300.0),
    ];
    let chart = sample_chart(&path, 3).expect("chart");
    let elevations: Vec<Option<f64>> = chart.iter().map(|c| c.elevation).collect();
    assert_eq!(elevations, vec![Some(100.0), Some(200.0), Some(300.0)]);

    // 5 targets over 3 vertices: quarter points snap, never interpolate
    let chart = sample_chart(&path, 5).expect("chart");
    assert!(chart
        .iter()
        .all(|c| c.elevation.is_some_and(|e| [100.0, 200.0, 300.0].contains(&e))));
}

#[test]
fn chart_edge_cases() {
    assert!(sample_chart(&[], 15).expect("chart").is_empty());

    let single = sample_chart(&zigzag(10), 1).expect("chart");
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].distance, 0.0);

    let mut path = zigzag(10);
    path[0].elevation = None;
    assert_eq!(
        sample_chart(&path, 5),
        Err(GeoError::MissingElevation { index: 0 })
    );
}
