//! Closed-form eigendecomposition of a symmetric 2x2 spread matrix.
//!
//! The branch boundaries are epsilon-gated so near-diagonal and
//! near-isotropic matrices never hit the divide-by-`m01` path of the general
//! eigenvector formula. A smaller epsilon sends more matrices through the
//! general path, which is less stable close to degeneracy.

use glam::{Mat2, Vec2};

use crate::stats::SpreadMatrix;

/// Which branch of [`solve`] produced a decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EigenBranch {
    Diagonal,
    Isotropic,
    General,
}

/// Ellipse with semi-axes `a` (along the principal direction) and `b`,
/// rotated by `angle` radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ellipse {
    pub a: f32,
    pub b: f32,
    pub angle: f32,
}

impl Ellipse {
    /// `R(angle) * diag(a², b²) * R(angle)ᵀ`
    pub fn reconstruct(&self) -> SpreadMatrix {
        let (s, c) = self.angle.sin_cos();
        let a2 = self.a * self.a;
        let b2 = self.b * self.b;
        SpreadMatrix {
            m00: a2 * c * c + b2 * s * s,
            m01: (a2 - b2) * c * s,
            m11: a2 * s * s + b2 * c * c,
        }
    }

    /// Point on the boundary at parameter `phase`, relative to the centre.
    pub fn point_at(&self, phase: f32) -> Vec2 {
        let (sp, cp) = phase.sin_cos();
        let (sa, ca) = (-self.angle).sin_cos();
        Vec2::new(
            self.a * ca * cp + self.b * sa * sp,
            -self.a * sa * cp + self.b * ca * sp,
        )
    }
}

/// Eigenvalues `[λ1, λ2]` and unit eigenvectors (matching columns).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Eigen2 {
    pub values: [f32; 2],
    pub vectors: Mat2,
    pub branch: EigenBranch,
}

impl Eigen2 {
    pub fn ellipse(&self) -> Ellipse {
        let v1 = self.vectors.x_axis;
        Ellipse {
            a: self.values[0].abs().sqrt(),
            b: self.values[1].abs().sqrt(),
            angle: match self.branch {
                EigenBranch::General => v1.y.atan2(v1.x),
                EigenBranch::Diagonal | EigenBranch::Isotropic => 0.0,
            },
        }
    }

    /// Eigenvector columns scaled by the semi-axis lengths. Not orthonormal;
    /// maps the unit circle onto the spread ellipse.
    pub fn transform(&self) -> Mat2 {
        Mat2::from_cols(
            self.vectors.x_axis * self.values[0].abs().sqrt(),
            self.vectors.y_axis * self.values[1].abs().sqrt(),
        )
    }
}

/// Unit eigenvector for `lambda`, from whichever row of `(m - λI)v = 0` is
/// better conditioned.
fn eigenvector(m: &SpreadMatrix, lambda: f32) -> Vec2 {
    let from_first_row = Vec2::new(m.m01, lambda - m.m00);
    let from_second_row = Vec2::new(lambda - m.m11, m.m01);
    let v = if from_first_row.length_squared() >= from_second_row.length_squared() {
        from_first_row
    } else {
        from_second_row
    };
    if v.length_squared() > f32::EPSILON * f32::EPSILON {
        v.normalize()
    } else {
        Vec2::X
    }
}

pub fn solve(m: &SpreadMatrix, epsilon: f32) -> Eigen2 {
    // NaN ratios (zero diagonal) fail both comparisons and fall through.
    if (m.m01 / m.m00).abs() < epsilon && (m.m01 / m.m11).abs() < epsilon {
        return Eigen2 {
            values: [m.m00, m.m11],
            vectors: Mat2::IDENTITY,
            branch: EigenBranch::Diagonal,
        };
    }

    let half_trace = m.trace() / 2.0;
    let radicand = m.trace() * m.trace() - 4.0 * m.determinant();
    let disc_root = radicand.max(0.0).sqrt() / 2.0;
    if disc_root < epsilon {
        return Eigen2 {
            values: [half_trace, half_trace],
            vectors: Mat2::IDENTITY,
            branch: EigenBranch::Isotropic,
        };
    }

    let l1 = half_trace - disc_root;
    let l2 = half_trace + disc_root;
    Eigen2 {
        values: [l1, l2],
        vectors: Mat2::from_cols(eigenvector(m, l1), eigenvector(m, l2)),
        branch: EigenBranch::General,
    }
}

pub fn solve_ellipse(m: &SpreadMatrix, epsilon: f32) -> Ellipse {
    solve(m, epsilon).ellipse()
}
