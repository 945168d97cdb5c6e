//! Startup configuration for the activity engine.
//!
//! A deployment is either one of the named [`Preset`]s or a TOML file with the
//! same shape as [`EngineConfig`]. Nothing here can change once the engine
//! has been built.

use std::f32::consts::TAU;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one real speaker is required")]
    NoSpeakers,
    #[error("history gain must be inside (0, 1), got {0}")]
    GainOutOfRange(f32),
    #[error("history window capacity must be at least one frame")]
    ZeroCapacity,
    #[error("minimum weight must be inside [0, 1), got {0}")]
    MinWeightOutOfRange(f32),
    #[error("eigensolver epsilon must be positive and finite, got {0}")]
    BadEpsilon(f32),
    #[error("virtual center weight must be positive and finite, got {0}")]
    BadVirtualWeight(f32),
    #[error("rotation frequency must be finite, got {0}")]
    BadRotateFreq(f32),
    #[error("radius must be non-negative and finite, got {0}")]
    BadRadius(f32),
    #[error("expected {expected} speaker positions, got {got}")]
    PositionCount { expected: usize, got: usize },
    #[error("unknown preset \"{0}\" (expected one of: dots, ball, ellipse, transform)")]
    UnknownPreset(String),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How a windowed fraction of talking frames becomes a weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shaping {
    /// `max(fraction, min_weight)`
    #[default]
    Floor,
    /// `fraction² · (1 - min_weight) + min_weight`
    Squared,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryPolicy {
    Exponential {
        gain: f32,
    },
    Windowed {
        capacity: usize,
        #[serde(default)]
        min_weight: f32,
        #[serde(default)]
        shaping: Shaping,
    },
}

/// Non-physical speaker at index 0 with a constant weight.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VirtualCenter {
    pub weight: f32,
    #[serde(default)]
    pub position: [f32; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionModel {
    /// Fixed-radius circle around the centroid; ignores the ellipse.
    Orbit { radius: f32 },
    /// Trace the spread ellipse boundary with rotation compensation.
    EllipseLocked,
    /// Apply the scaled eigenvector matrix to the unit circle.
    TransformProjected,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of real speakers, i.e. arguments per talk event.
    pub speakers: usize,
    pub layout_radius: f32,
    /// Explicit real-speaker positions; defaults to a circle layout.
    pub positions: Option<Vec<[f32; 2]>>,
    pub history: HistoryPolicy,
    pub virtual_center: Option<VirtualCenter>,
    pub motion: MotionModel,
    /// Revolutions per second.
    pub rotate_freq: f32,
    /// Keep the phase inside (-π, π]. Always on for the ellipse-locked model.
    pub wrap_phase: bool,
    pub epsilon: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::preset(Preset::Dots)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Dots,
    Ball,
    Ellipse,
    Transform,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Dots, Preset::Ball, Preset::Ellipse, Preset::Transform];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Dots => "dots",
            Preset::Ball => "ball",
            Preset::Ellipse => "ellipse",
            Preset::Transform => "transform",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl EngineConfig {
    pub fn preset(preset: Preset) -> Self {
        let base = Self {
            speakers: DEFAULT_SPEAKERS,
            layout_radius: LAYOUT_RADIUS,
            positions: None,
            history: HistoryPolicy::Exponential { gain: HISTORY_GAIN },
            virtual_center: None,
            motion: MotionModel::Orbit {
                radius: ORBIT_RADIUS,
            },
            rotate_freq: ROTATE_FREQ,
            wrap_phase: true,
            epsilon: EIGEN_EPSILON,
        };
        match preset {
            Preset::Dots => base,
            Preset::Ball => Self {
                history: HistoryPolicy::Windowed {
                    capacity: HISTORY_SIZE,
                    min_weight: 0.1,
                    shaping: Shaping::Floor,
                },
                motion: MotionModel::EllipseLocked,
                ..base
            },
            Preset::Ellipse => Self {
                speakers: 5,
                history: HistoryPolicy::Windowed {
                    capacity: SHORT_HISTORY_SIZE,
                    min_weight: 0.0,
                    shaping: Shaping::Squared,
                },
                virtual_center: Some(VirtualCenter {
                    weight: VIRTUAL_CENTER_WEIGHT,
                    position: [0.0, 0.0],
                }),
                motion: MotionModel::EllipseLocked,
                ..base
            },
            Preset::Transform => Self {
                speakers: 5,
                history: HistoryPolicy::Windowed {
                    capacity: HISTORY_SIZE,
                    min_weight: 0.05,
                    shaping: Shaping::Squared,
                },
                motion: MotionModel::TransformProjected,
                wrap_phase: false,
                ..base
            },
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speakers == 0 {
            return Err(ConfigError::NoSpeakers);
        }
        if !(self.layout_radius >= 0.0 && self.layout_radius.is_finite()) {
            return Err(ConfigError::BadRadius(self.layout_radius));
        }
        if let Some(positions) = &self.positions {
            if positions.len() != self.speakers {
                return Err(ConfigError::PositionCount {
                    expected: self.speakers,
                    got: positions.len(),
                });
            }
        }
        match self.history {
            HistoryPolicy::Exponential { gain } => {
                if !(gain > 0.0 && gain < 1.0) {
                    return Err(ConfigError::GainOutOfRange(gain));
                }
            }
            HistoryPolicy::Windowed {
                capacity,
                min_weight,
                ..
            } => {
                if capacity == 0 {
                    return Err(ConfigError::ZeroCapacity);
                }
                if !(0.0..1.0).contains(&min_weight) {
                    return Err(ConfigError::MinWeightOutOfRange(min_weight));
                }
            }
        }
        if let Some(center) = &self.virtual_center {
            if !(center.weight > 0.0 && center.weight.is_finite()) {
                return Err(ConfigError::BadVirtualWeight(center.weight));
            }
        }
        if let MotionModel::Orbit { radius } = self.motion {
            if !(radius >= 0.0 && radius.is_finite()) {
                return Err(ConfigError::BadRadius(radius));
            }
        }
        if !self.rotate_freq.is_finite() {
            return Err(ConfigError::BadRotateFreq(self.rotate_freq));
        }
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(ConfigError::BadEpsilon(self.epsilon));
        }
        Ok(())
    }

    /// Index of the first real speaker in the engine's speaker list.
    pub fn first_real_index(&self) -> usize {
        usize::from(self.virtual_center.is_some())
    }

    /// All speaker positions in engine order: the virtual center (if any)
    /// followed by the real speakers.
    pub fn speaker_positions(&self) -> Vec<Vec2> {
        let real = match &self.positions {
            Some(explicit) => explicit.iter().copied().map(Vec2::from).collect(),
            None => circle_layout(self.speakers, self.layout_radius),
        };
        self.virtual_center
            .iter()
            .map(|c| Vec2::from(c.position))
            .chain(real)
            .collect()
    }
}

/// `count` points evenly spaced counter-clockwise on a circle, starting on +x.
pub fn circle_layout(count: usize, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}
