use glam::{Mat2, Vec2};
use std::time::Duration;

use crate::config::{ConfigError, EngineConfig, MotionModel};
use crate::eigen::{self, Eigen2, Ellipse};
use crate::history::ActivityHistory;
use crate::motion::{MotionIntegrator, MotionState};
use crate::state::{FrameSnapshot, SpeakerIndicator};
use crate::stats::{self, SpreadMatrix};

/// Speaker-activity to motion engine.
///
/// The engine owns the fixed speaker layout, the activity history of every
/// real speaker and the motion state carried between frames. Each call to
/// [`ActivityEngine::tick`] runs history update, weighted statistics,
/// eigendecomposition and motion integration, in that order.
///
/// Typical usage:
/// - Construct with `ActivityEngine::new(config)`
/// - Feed decoded talk events through `set_talking` (or `talking_mut`)
/// - Call `tick(dt)` once per frame, then hand `snapshot()` to the renderer
pub struct ActivityEngine {
    pub config: EngineConfig,
    positions: Vec<Vec2>,
    weights: Vec<f32>,
    talking: Vec<bool>,
    history: ActivityHistory,
    first_real: usize,
    virtual_weight: Option<f32>,
    integrator: MotionIntegrator,
    motion: MotionState,
    previous_point: Vec2,
    centroid: Vec2,
    spread: SpreadMatrix,
    eigen: Eigen2,
    ticks: u64,
}

impl ActivityEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let positions = config.speaker_positions();
        let first_real = config.first_real_index();
        let virtual_weight = config.virtual_center.as_ref().map(|c| c.weight);
        let history = ActivityHistory::new(config.speakers, &config.history);
        let integrator =
            MotionIntegrator::new(config.motion, config.rotate_freq, config.wrap_phase);

        let mut weights = vec![0.0; positions.len()];
        if let Some(w) = virtual_weight {
            weights[0] = w;
        }
        weights[first_real..].copy_from_slice(history.weights());

        let centroid = stats::compute(&positions, &weights)
            .map(|s| s.centroid)
            .unwrap_or(Vec2::ZERO);
        let eigen = eigen::solve(&SpreadMatrix::ZERO, config.epsilon);

        log::info!(
            "activity engine: {} speakers{}, history {:?}, motion {:?}",
            config.speakers,
            if virtual_weight.is_some() {
                " + virtual center"
            } else {
                ""
            },
            config.history,
            config.motion
        );

        Ok(Self {
            talking: vec![false; config.speakers],
            config,
            positions,
            weights,
            history,
            first_real,
            virtual_weight,
            integrator,
            motion: MotionState {
                point: centroid,
                ..MotionState::default()
            },
            previous_point: centroid,
            centroid,
            spread: SpreadMatrix::ZERO,
            eigen,
            ticks: 0,
        })
    }

    /// Replace the current talk flags. A slice of the wrong length is
    /// rejected and the previous flags are kept.
    pub fn set_talking(&mut self, flags: &[bool]) -> bool {
        if flags.len() != self.talking.len() {
            log::warn!(
                "expected {} talk flags, got {}",
                self.talking.len(),
                flags.len()
            );
            return false;
        }
        self.talking.copy_from_slice(flags);
        true
    }

    pub fn talking(&self) -> &[bool] {
        &self.talking
    }

    pub fn talking_mut(&mut self) -> &mut [bool] {
        &mut self.talking
    }

    pub fn tick(&mut self, dt: Duration) {
        self.history.update(&self.talking);
        self.weights[self.first_real..].copy_from_slice(self.history.weights());

        match stats::compute(&self.positions, &self.weights) {
            Some(s) => {
                self.centroid = s.centroid;
                self.spread = s.spread;
            }
            // Nobody has any weight: hold the centroid, collapse the spread.
            None => self.spread = SpreadMatrix::ZERO,
        }

        self.eigen = eigen::solve(&self.spread, self.config.epsilon);
        let ellipse = self.eigen.ellipse();
        let transform = self.eigen.transform();

        self.previous_point = self.motion.point;
        self.motion = self.integrator.step(
            dt.as_secs_f32(),
            self.centroid,
            &ellipse,
            &transform,
            &self.motion,
        );
        self.ticks += 1;

        if self.ticks % 600 == 0 {
            log::debug!(
                "tick {}: weights {:?} centroid {:?} ellipse {:?}",
                self.ticks,
                self.weights,
                self.centroid,
                ellipse
            );
        }
    }

    /// All speaker positions, virtual center first when configured.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Weights aligned with [`ActivityEngine::positions`].
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight of real speaker `i` (the index used by talk events).
    pub fn speaker_weight(&self, i: usize) -> Option<f32> {
        self.weights.get(self.first_real + i).copied()
    }

    pub fn history(&self) -> &ActivityHistory {
        &self.history
    }

    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    pub fn spread(&self) -> SpreadMatrix {
        self.spread
    }

    pub fn eigen(&self) -> &Eigen2 {
        &self.eigen
    }

    pub fn ellipse(&self) -> Ellipse {
        self.eigen.ellipse()
    }

    pub fn transform(&self) -> Mat2 {
        self.eigen.transform()
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let speakers = self
            .positions
            .iter()
            .zip(&self.weights)
            .enumerate()
            .map(|(i, (&position, &weight))| {
                let is_virtual = self.virtual_weight.is_some() && i == 0;
                SpeakerIndicator {
                    position,
                    weight,
                    talking: !is_virtual && self.talking[i - self.first_real],
                    is_virtual,
                }
            })
            .collect();

        let (ellipse, transform) = match self.config.motion {
            MotionModel::Orbit { .. } => (None, None),
            MotionModel::EllipseLocked => (Some(self.ellipse()), None),
            MotionModel::TransformProjected => (None, Some(self.transform())),
        };

        FrameSnapshot {
            speakers,
            centroid: self.centroid,
            point: self.motion.point,
            previous_point: self.previous_point,
            ellipse,
            transform,
        }
    }
}
