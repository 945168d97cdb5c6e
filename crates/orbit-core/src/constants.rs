// Shared tuning constants used by the engine and the native frontend.

// Ingress
pub const OSC_PORT: u16 = 12000; // well-known UDP port for talk events
pub const OSC_ADDRESS: &str = "/speaking";

// Activity history
pub const HISTORY_GAIN: f32 = 0.99; // 1.0 ignores input, 0.0 reacts immediately
pub const HISTORY_SIZE: usize = 60 * 30; // 60fps * 30 seconds
pub const SHORT_HISTORY_SIZE: usize = 300; // 5 seconds at 60fps

// Statistics / eigensolver
pub const EIGEN_EPSILON: f32 = 0.01;

// Motion
pub const ROTATE_FREQ: f32 = 0.25; // revolutions per second
pub const ORBIT_RADIUS: f32 = 12.0; // plane units for the simple orbit

// Scene layout
pub const DEFAULT_SPEAKERS: usize = 4;
pub const LAYOUT_RADIUS: f32 = 200.0; // plane units from the origin to each speaker
pub const VIRTUAL_CENTER_WEIGHT: f32 = 0.5;

// Visual sizing (pixels)
pub const DOT_BASE_SIZE: f32 = 30.0; // indicator radius at full weight
pub const HUB_RADIUS: f32 = 10.0; // fixed marker at the centroid
pub const BALL_RADIUS: f32 = 8.0;
pub const TRAIL_LENGTH: usize = 90; // frames of trail kept behind the ball
pub const RING_THICKNESS: f32 = 2.0;

// Palette
pub const BACKGROUND_RGB: [f32; 3] = [20.0 / 255.0, 20.0 / 255.0, 20.0 / 255.0];
pub const SPEAKER_RGB: [f32; 3] = [200.0 / 255.0, 200.0 / 255.0, 200.0 / 255.0];
pub const TALKING_RGB: [f32; 3] = [0.95, 0.55, 0.3];
pub const BALL_RGB: [f32; 3] = [0.3, 0.7, 0.95];
pub const ELLIPSE_RGB: [f32; 3] = [0.4, 0.45, 0.6];
