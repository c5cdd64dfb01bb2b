// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end properties of the track pipeline

use raceway_geometry::curvature::{
    curvature_radii, max_excess_angle, safe_turn_angle, turn_at, RADIUS_SMOOTHING_WINDOW,
};
use raceway_geometry::track::{condition_path, generate_track_with_options};
use raceway_geometry::{
    compute_offsets, generate_track, limit_curvature, ConditioningOptions, ControlPoint, Mesh,
    MeshBuilder, PathSample, PathSource, Point3, TrackParams,
};

fn diamond() -> PathSource {
    PathSource::control_points([(0.0, 0.0), (30.0, 20.0), (50.0, 0.0), (30.0, -20.0)])
}

/// Irregular loop with a tight pinch and two nearly reversing corners
fn pinched() -> PathSource {
    PathSource::control_points([
        (-50.0, 0.0),
        (-55.0, 10.0),
        (-45.0, 20.0),
        (-35.0, 25.0),
        (-30.0, 5.0),
        (-20.0, 30.0),
        (0.0, 30.0),
        (10.0, 12.0),
        (30.0, 20.0),
        (40.0, 5.0),
        (20.0, -5.0),
        (35.0, -20.0),
        (0.0, -25.0),
        (-30.0, -15.0),
    ])
}

/// Straight out, 1.5 across, straight back: two near-reversing corners
fn hairpin() -> Vec<PathSample> {
    let mut path: Vec<PathSample> = (0..=10)
        .map(|i| Point3::new(i as f64 * 5.0, 0.0, 0.0))
        .collect();
    path.extend((1..=9).rev().map(|i| Point3::new(i as f64 * 5.0, 1.5, 0.0)));
    path
}

fn sources() -> Vec<PathSource> {
    vec![
        diamond(),
        pinched(),
        PathSource::circle(12.0),
        PathSource::oval(40.0, 15.0),
        PathSource::stadium(60.0, 20.0),
        PathSource::figure_eight(20.0, 4.0),
    ]
}

fn assert_watertight(mesh: &Mesh, samples: usize) {
    assert_eq!(mesh.vertex_count(), 4 * samples);
    assert_eq!(mesh.quad_count(), 4 * samples);
    assert!(mesh
        .quads
        .iter()
        .flatten()
        .all(|&v| (v as usize) < mesh.vertex_count()));
    assert!(mesh.vertex_valence().iter().all(|&v| v == 4));
    for i in 0..mesh.quad_count() {
        assert!(mesh.quad_area(i) > 1e-9, "quad {} is degenerate", i);
    }
}

#[test]
fn test_path_is_closed() {
    for source in sources() {
        let track = generate_track(&source, &TrackParams::default()).unwrap();
        let path = &track.path;
        let n = path.len();
        let mean = (0..n)
            .map(|i| (path[(i + 1) % n] - path[i]).norm())
            .sum::<f64>()
            / n as f64;

        // The wrap segment is an ordinary segment, not a seam
        let wrap = (path[0] - path[n - 1]).norm();
        assert!(wrap < 2.0 * mean, "{}: wrap {} vs mean {}", source.kind(), wrap, mean);
    }
}

#[test]
fn test_offsets_stay_within_half_width() {
    let params = TrackParams::default();
    let hw = params.half_width();
    for source in sources() {
        let raw = source.to_path(&params).unwrap();
        let (path, _) = condition_path(raw, &params, &ConditioningOptions::default()).unwrap();
        for o in compute_offsets(&path, hw).unwrap() {
            assert!(o.left > 0.0 && o.left <= hw, "{}: left {}", source.kind(), o.left);
            assert!(o.right > 0.0 && o.right <= hw, "{}: right {}", source.kind(), o.right);
        }
    }
}

#[test]
fn test_report_matches_returned_path() {
    let params = TrackParams::default();
    for source in sources() {
        let track = generate_track(&source, &params).unwrap();
        let measured = max_excess_angle(&track.path, params.track_width);
        assert!((measured - track.report.max_excess_angle).abs() < 1e-12);
        assert!(track.report.iterations <= ConditioningOptions::default().max_iterations);
    }
}

#[test]
fn test_topology_of_every_part() {
    for source in sources() {
        let track = generate_track(&source, &TrackParams::default()).unwrap();
        let n = track.path.len();
        for (name, mesh) in track.parts() {
            assert_watertight(mesh, n);
            assert!(mesh.signed_volume() > 0.0, "{} of {} faces inward", name, source.kind());
        }
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let params = TrackParams::default();
    for source in sources() {
        let a = generate_track(&source, &params).unwrap();
        let b = generate_track(&source, &params).unwrap();
        assert_eq!(a.path, b.path);
        assert_eq!(a.surface.quads, b.surface.quads);
        assert_eq!(a, b);
    }
}

#[test]
fn test_diamond_radius_stays_above_minimum() {
    let params = TrackParams::default();
    let track = generate_track(&diamond(), &params).unwrap();

    assert!(track.path.len() >= 100);
    let min_radius = curvature_radii(&track.path, RADIUS_SMOOTHING_WINDOW)
        .into_iter()
        .fold(f64::INFINITY, f64::min);
    assert!(min_radius >= 0.85 * params.half_width(), "min radius {}", min_radius);

    // No inside offset is forced onto the floor
    for o in compute_offsets(&track.path, params.half_width()).unwrap() {
        assert!(o.left > 0.1 && o.right > 0.1);
    }
}

#[test]
fn test_hairpin_corner_is_relaxed() {
    let path = hairpin();
    let before = turn_at(&path, 10);
    assert!(before.angle.to_degrees() > 160.0);

    let limit = safe_turn_angle(5.0, 6.0);
    assert!((limit.to_degrees() - 83.6).abs() < 0.1);

    let (relaxed, report) = limit_curvature(path, 6.0, 50).unwrap();
    assert_eq!(relaxed.len(), 20);
    assert!(turn_at(&relaxed, 10).angle < limit);
    assert!(turn_at(&relaxed, 0).angle < limit);

    // The cap is reached; the remaining excess is reported, not hidden
    assert!(!report.converged);
    assert_eq!(report.iterations, 50);
    assert!(report.max_excess_angle > 0.0);
}

#[test]
fn test_elevation_follows_control_points() {
    let points = vec![
        ControlPoint::with_elevation(0.0, 0.0, 0.0),
        ControlPoint::with_elevation(40.0, 0.0, 3.0),
        ControlPoint::with_elevation(40.0, 40.0, 5.0),
        ControlPoint::with_elevation(0.0, 40.0, 2.0),
    ];
    let source = PathSource::ControlPoints {
        points,
        elevation: None,
    };
    let track = generate_track(&source, &TrackParams::default()).unwrap();

    let (min, max) = track.surface.bounds();
    assert!(min.z < 0.5);
    assert!(max.z > 5.0);
    // Roadway is still exactly one thickness deep at every sample
    for section in track.surface.positions.chunks_exact(4) {
        assert!(((section[0].z - section[3].z) - 0.3).abs() < 1e-9);
    }
}

#[test]
fn test_host_builder_receives_same_geometry() {
    struct Counter {
        vertices: usize,
        quads: usize,
    }
    impl MeshBuilder for Counter {
        type VertexId = usize;
        fn new_vertex(&mut self, _position: Point3<f64>) -> usize {
            self.vertices += 1;
            self.vertices - 1
        }
        fn new_quad(&mut self, quad: [usize; 4]) {
            assert!(quad.iter().all(|&v| v < self.vertices));
            self.quads += 1;
        }
    }

    let track = generate_track(&diamond(), &TrackParams::default()).unwrap();
    let mut host = Counter {
        vertices: 0,
        quads: 0,
    };
    track.combined().replay_into(&mut host);
    assert_eq!(host.quads, track.quad_count());
    assert_eq!(host.vertices, 12 * track.path.len());
}

#[test]
fn test_triangulated_output() {
    let track = generate_track(&PathSource::circle(20.0), &TrackParams::default()).unwrap();
    let tri = track.surface.triangulate();
    assert_eq!(tri.triangle_count(), 2 * track.surface.quad_count());
    assert_eq!(tri.normals.len(), tri.positions.len());
}

#[test]
fn test_short_iteration_budget_still_meshes() {
    let options = ConditioningOptions {
        max_iterations: 1,
        ..Default::default()
    };
    let track = generate_track_with_options(&pinched(), &TrackParams::default(), &options).unwrap();
    assert!(track.report.iterations <= 1);
    assert_eq!(track.surface.quad_count(), 4 * track.path.len());
}
