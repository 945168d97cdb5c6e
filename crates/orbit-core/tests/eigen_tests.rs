// Host-side tests for the symmetric 2x2 eigensolver.

use std::f32::consts::{FRAC_PI_4, PI};

use orbit_core::eigen::{solve, solve_ellipse};
use orbit_core::{EigenBranch, Ellipse, SpreadMatrix, EIGEN_EPSILON};
use rand::prelude::*;

fn assert_reconstructs(m: &SpreadMatrix, epsilon: f32) {
    let eigen = solve(m, epsilon);
    let e = eigen.ellipse();
    assert!(
        e.a.is_finite() && e.b.is_finite() && e.angle.is_finite(),
        "non-finite ellipse {e:?} for {m:?}"
    );
    let r = e.reconstruct();
    let scale = m.m00.abs().max(m.m11.abs());
    let tol = epsilon * (1.0 + scale) + 1e-4 * scale;
    for (got, want) in [(r.m00, m.m00), (r.m01, m.m01), (r.m11, m.m11)] {
        assert!(
            (got - want).abs() <= tol,
            "{m:?} reconstructed as {r:?} via {e:?} ({:?} branch)",
            eigen.branch
        );
    }
}

fn psd_from(l1: f32, l2: f32, angle: f32) -> SpreadMatrix {
    Ellipse {
        a: l1.sqrt(),
        b: l2.sqrt(),
        angle,
    }
    .reconstruct()
}

#[test]
fn diagonal_matrix_short_circuits() {
    let eigen = solve(&SpreadMatrix::new(4.0, 0.0, 1.0), EIGEN_EPSILON);
    assert_eq!(eigen.branch, EigenBranch::Diagonal);
    let e = eigen.ellipse();
    assert_eq!((e.a, e.b, e.angle), (2.0, 1.0, 0.0));
}

#[test]
fn nearly_diagonal_matrix_short_circuits() {
    let m = SpreadMatrix::new(100.0, 0.5, 80.0);
    let eigen = solve(&m, EIGEN_EPSILON);
    assert_eq!(eigen.branch, EigenBranch::Diagonal);
    assert_eq!(eigen.ellipse().angle, 0.0);
    // A tighter tolerance pushes the same matrix through the general path.
    assert_eq!(solve(&m, 0.001).branch, EigenBranch::General);
}

#[test]
fn isotropic_matrix_becomes_a_circle() {
    let m = SpreadMatrix::new(3.0, 0.0, 3.0);
    let e = solve_ellipse(&m, EIGEN_EPSILON);
    assert!((e.a - 3.0_f32.sqrt()).abs() < 1e-6);
    assert_eq!(e.a, e.b);
    assert_eq!(e.angle, 0.0);

    // Off-diagonal large enough to skip the diagonal test, yet eigenvalues
    // closer than epsilon.
    let m = SpreadMatrix::new(0.01, 0.004, 0.01);
    let eigen = solve(&m, EIGEN_EPSILON);
    assert_eq!(eigen.branch, EigenBranch::Isotropic);
    let e = eigen.ellipse();
    assert!((e.a - 0.1).abs() < 1e-6);
    assert_eq!(e.a, e.b);
}

#[test]
fn general_matrix_returns_principal_angle() {
    let m = SpreadMatrix::new(2.0, 1.0, 2.0);
    let eigen = solve(&m, EIGEN_EPSILON);
    assert_eq!(eigen.branch, EigenBranch::General);
    assert!((eigen.values[0] - 1.0).abs() < 1e-5);
    assert!((eigen.values[1] - 3.0).abs() < 1e-5);
    let e = eigen.ellipse();
    assert!((e.a - 1.0).abs() < 1e-5);
    assert!((e.b - 3.0_f32.sqrt()).abs() < 1e-5);
    // Principal direction of the smaller eigenvalue is ±45° off the x axis
    // on the anti-diagonal; either sign of the eigenvector is acceptable.
    let folded = (e.angle + FRAC_PI_4).rem_euclid(PI);
    assert!(folded < 1e-5 || (PI - folded) < 1e-5, "angle {}", e.angle);
}

#[test]
fn eigenvectors_are_orthonormal() {
    let m = SpreadMatrix::new(5.0, -2.0, 1.0);
    let v = solve(&m, EIGEN_EPSILON).vectors;
    assert!((v.x_axis.length() - 1.0).abs() < 1e-5);
    assert!((v.y_axis.length() - 1.0).abs() < 1e-5);
    assert!(v.x_axis.dot(v.y_axis).abs() < 1e-5);
}

#[test]
fn transform_maps_unit_circle_onto_spread() {
    let m = SpreadMatrix::new(5.0, -2.0, 1.0);
    let t = solve(&m, EIGEN_EPSILON).transform();
    let product = t * t.transpose();
    assert!((product.x_axis.x - m.m00).abs() < 1e-4);
    assert!((product.y_axis.x - m.m01).abs() < 1e-4);
    assert!((product.x_axis.y - m.m01).abs() < 1e-4);
    assert!((product.y_axis.y - m.m11).abs() < 1e-4);
}

#[test]
fn degenerate_inputs_never_produce_nan() {
    let cases = [
        SpreadMatrix::ZERO,
        SpreadMatrix::new(0.0, 0.0, 5.0),
        SpreadMatrix::new(5.0, 0.0, 0.0),
        SpreadMatrix::new(1.0, 1.0, 1.0),
        SpreadMatrix::new(1e-12, 1e-12, 1e-12),
        psd_from(0.0, 40.0, 0.3),
    ];
    for m in &cases {
        assert_reconstructs(m, EIGEN_EPSILON);
    }
}

#[test]
fn round_trip_random_psd_matrices() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..2000 {
        let l1 = rng.gen_range(0.0..100.0);
        let l2 = rng.gen_range(0.0..100.0);
        let angle = rng.gen_range(-PI..PI);
        assert_reconstructs(&psd_from(l1, l2, angle), EIGEN_EPSILON);
    }
}

#[test]
fn round_trip_near_diagonal_matrices() {
    let mut rng = StdRng::seed_from_u64(43);
    for _ in 0..1000 {
        let l1 = rng.gen_range(0.1..100.0);
        let l2 = rng.gen_range(0.1..100.0);
        let angle = rng.gen_range(-1e-3..1e-3);
        assert_reconstructs(&psd_from(l1, l2, angle), EIGEN_EPSILON);
    }
}

#[test]
fn round_trip_near_isotropic_matrices() {
    let mut rng = StdRng::seed_from_u64(44);
    for _ in 0..1000 {
        let l = rng.gen_range(0.0..100.0);
        let delta = rng.gen_range(0.0..0.03);
        let angle = rng.gen_range(-PI..PI);
        assert_reconstructs(&psd_from(l, l + delta, angle), EIGEN_EPSILON);
    }
}
