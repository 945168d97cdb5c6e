//! Phase integration and the mapping from phase to a moving point.

use std::f32::consts::{PI, TAU};

use glam::{Mat2, Vec2};

use crate::config::MotionModel;
use crate::eigen::Ellipse;

/// Wrap an angle into (-π, π].
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = (phase + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// State carried between frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionState {
    pub point: Vec2,
    pub phase: f32,
    pub ellipse_angle: f32,
}

/// Advances the phase and places the moving point for one frame.
#[derive(Clone, Debug)]
pub struct MotionIntegrator {
    pub model: MotionModel,
    pub rotate_freq: f32,
    pub wrap: bool,
}

impl MotionIntegrator {
    pub fn new(model: MotionModel, rotate_freq: f32, wrap: bool) -> Self {
        Self {
            model,
            rotate_freq,
            wrap,
        }
    }

    /// Phase advance for `dt` seconds.
    #[inline]
    pub fn advance(&self, dt: f32) -> f32 {
        TAU * self.rotate_freq * dt
    }

    pub fn step(
        &self,
        dt: f32,
        centroid: Vec2,
        ellipse: &Ellipse,
        transform: &Mat2,
        previous: &MotionState,
    ) -> MotionState {
        match self.model {
            MotionModel::Orbit { radius } => {
                let phase = self.next_phase(previous.phase, dt);
                let (s, c) = phase.sin_cos();
                MotionState {
                    point: centroid + radius * Vec2::new(c, s),
                    phase,
                    ellipse_angle: previous.ellipse_angle,
                }
            }
            MotionModel::EllipseLocked => {
                // Undo the ellipse's rotation since last frame before advancing.
                let compensated = previous.phase - (ellipse.angle - previous.ellipse_angle);
                let phase = wrap_phase(compensated + self.advance(dt));
                MotionState {
                    point: centroid + ellipse.point_at(phase),
                    phase,
                    ellipse_angle: ellipse.angle,
                }
            }
            MotionModel::TransformProjected => {
                let phase = self.next_phase(previous.phase, dt);
                let (s, c) = phase.sin_cos();
                MotionState {
                    point: centroid + *transform * Vec2::new(c, s),
                    phase,
                    ellipse_angle: previous.ellipse_angle,
                }
            }
        }
    }

    /// Unwrapped phase is reduced into [0, 2π) so the `f32` step never rounds
    /// away on long runs.
    fn next_phase(&self, previous: f32, dt: f32) -> f32 {
        if self.wrap {
            wrap_phase(previous + self.advance(dt))
        } else {
            (previous.rem_euclid(TAU) + self.advance(dt)).rem_euclid(TAU)
        }
    }
}
