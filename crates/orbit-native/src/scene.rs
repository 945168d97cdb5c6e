//! Turns a [`FrameSnapshot`] into renderer instances.

use std::collections::VecDeque;

use glam::{Mat2, Vec2};
use orbit_core::{
    Ellipse, FrameSnapshot, View, BALL_RADIUS, BALL_RGB, DOT_BASE_SIZE, ELLIPSE_RGB, HUB_RADIUS,
    RING_THICKNESS, SPEAKER_RGB, TALKING_RGB, TRAIL_LENGTH,
};

use crate::render::InstanceData;

/// Recent ball positions, newest last.
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, p: Vec2) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(p);
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(TRAIL_LENGTH)
    }
}

#[inline]
fn rgba(rgb: [f32; 3], a: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], a]
}

fn disc(view: &View, center: Vec2, radius: f32, color: [f32; 4]) -> InstanceData {
    InstanceData {
        center: view.to_pixels(center).to_array(),
        half_extent: [radius, radius],
        rotation: 0.0,
        ring: 0.0,
        color,
    }
}

fn ellipse_ring(view: &View, center: Vec2, ellipse: &Ellipse, color: [f32; 4]) -> InstanceData {
    InstanceData {
        center: view.to_pixels(center).to_array(),
        half_extent: [ellipse.a * view.scale, ellipse.b * view.scale],
        // Pixel space has +y down, which flips the sense of rotation.
        rotation: -ellipse.angle,
        ring: RING_THICKNESS,
        color,
    }
}

/// Image of the unit circle under `transform`, as an ellipse.
fn transform_ellipse(transform: &Mat2) -> Ellipse {
    let (u, v) = (transform.x_axis, transform.y_axis);
    Ellipse {
        a: u.length(),
        b: v.length(),
        angle: u.y.atan2(u.x),
    }
}

pub fn build_instances(snapshot: &FrameSnapshot, trail: &Trail, view: &View) -> Vec<InstanceData> {
    let mut out = Vec::with_capacity(snapshot.speakers.len() * 2 + trail.points.len() + 4);

    for s in &snapshot.speakers {
        if s.is_virtual {
            out.push(disc(view, s.position, s.radius(), rgba(SPEAKER_RGB, 0.25)));
            continue;
        }
        let mut outline = disc(view, s.position, DOT_BASE_SIZE, rgba(SPEAKER_RGB, 0.2));
        outline.ring = 1.0;
        out.push(outline);
        let rgb = if s.talking { TALKING_RGB } else { SPEAKER_RGB };
        out.push(disc(view, s.position, s.radius(), rgba(rgb, 1.0)));
    }

    if let Some(e) = &snapshot.ellipse {
        out.push(ellipse_ring(view, snapshot.centroid, e, rgba(ELLIPSE_RGB, 0.8)));
    }
    if let Some(t) = &snapshot.transform {
        let e = transform_ellipse(t);
        out.push(ellipse_ring(view, snapshot.centroid, &e, rgba(ELLIPSE_RGB, 0.8)));
    }

    out.push(disc(view, snapshot.centroid, HUB_RADIUS, rgba(SPEAKER_RGB, 1.0)));

    let n = trail.points.len().max(1) as f32;
    for (i, &p) in trail.points.iter().enumerate() {
        let fade = (i + 1) as f32 / n;
        out.push(disc(
            view,
            p,
            BALL_RADIUS * (0.3 + 0.5 * fade),
            rgba(BALL_RGB, 0.5 * fade),
        ));
    }
    out.push(disc(view, snapshot.point, BALL_RADIUS, rgba(BALL_RGB, 1.0)));

    out
}
