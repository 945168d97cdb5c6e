pub mod clock;
pub mod config;
pub mod constants;
pub mod eigen;
pub mod engine;
pub mod history;
pub mod ingress;
pub mod motion;
pub mod receiver;
pub mod state;
pub mod stats;
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use clock::FrameClock;
pub use config::*;
pub use constants::*;
pub use eigen::{Eigen2, EigenBranch, Ellipse};
pub use engine::ActivityEngine;
pub use history::ActivityHistory;
pub use ingress::{ActivityIngress, IngressError, TalkFlags};
pub use motion::{wrap_phase, MotionIntegrator, MotionState};
pub use receiver::OscReceiver;
pub use state::*;
pub use stats::{SpreadMatrix, WeightedStats};
