//! Weighted centroid and spread of speaker positions.

use glam::{Mat2, Vec2};

/// Symmetric 2x2 matrix. The single off-diagonal field keeps `m01 == m10`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpreadMatrix {
    pub m00: f32,
    pub m01: f32,
    pub m11: f32,
}

impl SpreadMatrix {
    pub const ZERO: Self = Self {
        m00: 0.0,
        m01: 0.0,
        m11: 0.0,
    };

    pub fn new(m00: f32, m01: f32, m11: f32) -> Self {
        Self { m00, m01, m11 }
    }

    #[inline]
    pub fn m10(&self) -> f32 {
        self.m01
    }

    #[inline]
    pub fn trace(&self) -> f32 {
        self.m00 + self.m11
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.m00 * self.m11 - self.m01 * self.m01
    }

    pub fn to_mat2(&self) -> Mat2 {
        Mat2::from_cols(Vec2::new(self.m00, self.m01), Vec2::new(self.m01, self.m11))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedStats {
    pub centroid: Vec2,
    pub spread: SpreadMatrix,
    pub total_weight: f32,
}

/// Weighted centroid and covariance-like spread of `positions`.
///
/// Returns `None` when the weights sum to (almost) zero; callers keep their
/// previous centroid in that case. Slices are zipped to the shorter length.
pub fn compute(positions: &[Vec2], weights: &[f32]) -> Option<WeightedStats> {
    let total_weight: f32 = weights.iter().take(positions.len()).sum();
    if total_weight <= f32::EPSILON {
        return None;
    }

    let weighted_sum = positions
        .iter()
        .zip(weights)
        .fold(Vec2::ZERO, |acc, (&p, &w)| acc + p * w);
    let centroid = weighted_sum / total_weight;

    let spread = positions
        .iter()
        .zip(weights)
        .fold(SpreadMatrix::ZERO, |acc, (&p, &w)| {
            let d = p - centroid;
            SpreadMatrix {
                m00: acc.m00 + w * d.x * d.x,
                m01: acc.m01 + w * d.x * d.y,
                m11: acc.m11 + w * d.y * d.y,
            }
        });

    Some(WeightedStats {
        centroid,
        spread,
        total_weight,
    })
}
