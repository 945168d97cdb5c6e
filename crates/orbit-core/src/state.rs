//! Visual-side state types shared with the native frontend.
//!
//! These types avoid referencing platform-specific APIs. The renderer only
//! ever sees a [`FrameSnapshot`] and maps it to the screen through a
//! [`View`].

use glam::{Mat2, Vec2};

use crate::constants::DOT_BASE_SIZE;
use crate::eigen::Ellipse;

/// Plane-to-pixel mapping: the plane origin sits at the window centre and
/// +y points up.
#[derive(Clone, Copy, Debug)]
pub struct View {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl View {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
        }
    }

    /// 1:1 mapping, zoomed out only when `extent` plane units around the
    /// origin would not fit inside the window.
    pub fn fit(width: f32, height: f32, extent: f32) -> Self {
        let scale = if extent > 0.0 {
            (0.5 * width.min(height) / extent).min(1.0)
        } else {
            1.0
        };
        Self {
            width,
            height,
            scale,
        }
    }

    /// Convert a plane position into pixel coordinates (origin top-left).
    pub fn to_pixels(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.width / 2.0 + p.x * self.scale,
            self.height / 2.0 - p.y * self.scale,
        )
    }
}

/// One ambient speaker marker. `weight` is typically in \[0, 1\].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpeakerIndicator {
    pub position: Vec2,
    pub weight: f32,
    pub talking: bool,
    pub is_virtual: bool,
}

impl SpeakerIndicator {
    /// On-screen radius in pixels; grows linearly with the weight.
    pub fn radius(&self) -> f32 {
        DOT_BASE_SIZE * self.weight.max(0.0)
    }
}

/// Everything the renderer needs for one frame.
///
/// `ellipse` is set for the ellipse-locked model and `transform` for the
/// transform-projected model; the simple orbit sets neither.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSnapshot {
    pub speakers: Vec<SpeakerIndicator>,
    pub centroid: Vec2,
    pub point: Vec2,
    pub previous_point: Vec2,
    pub ellipse: Option<Ellipse>,
    pub transform: Option<Mat2>,
}
