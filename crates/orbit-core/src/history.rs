//! Per-speaker activity history.
//!
//! Each real speaker's recent "talking" samples are reduced to a weight that
//! the statistics stage uses. Two policies are supported: an exponential
//! moving average and a fixed-length window of boolean samples.

use crate::config::{HistoryPolicy, Shaping};

/// How a windowed fraction is turned into a weight.
#[inline]
pub fn shape_weight(raw: f32, min_weight: f32, shaping: Shaping) -> f32 {
    match shaping {
        Shaping::Floor => raw.max(min_weight),
        Shaping::Squared => raw * raw * (1.0 - min_weight) + min_weight,
    }
}

/// Ring buffer of boolean samples for every speaker, sharing one write cursor.
#[derive(Clone, Debug)]
struct SampleWindow {
    samples: Vec<Vec<bool>>,
    true_counts: Vec<usize>,
    capacity: usize,
    cursor: usize,
}

impl SampleWindow {
    fn new(speakers: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: vec![vec![false; capacity]; speakers],
            true_counts: vec![0; speakers],
            capacity,
            cursor: 0,
        }
    }

    fn push(&mut self, flags: &[bool]) {
        let cursor = self.cursor;
        for (i, (ring, count)) in self
            .samples
            .iter_mut()
            .zip(self.true_counts.iter_mut())
            .enumerate()
        {
            let incoming = flags.get(i).copied().unwrap_or(false);
            let outgoing = std::mem::replace(&mut ring[cursor], incoming);
            match (outgoing, incoming) {
                (true, false) => *count -= 1,
                (false, true) => *count += 1,
                _ => {}
            }
        }
        self.cursor = (cursor + 1) % self.capacity;
    }

    fn fraction(&self, speaker: usize) -> f32 {
        self.true_counts
            .get(speaker)
            .map_or(0.0, |&c| c as f32 / self.capacity as f32)
    }
}

#[derive(Clone, Debug)]
enum Smoothing {
    Exponential { gain: f32 },
    Windowed {
        window: SampleWindow,
        min_weight: f32,
        shaping: Shaping,
    },
}

/// Smoothed activity for a fixed set of speakers.
///
/// Call [`ActivityHistory::update`] once per frame with the latest flags, then
/// read [`ActivityHistory::weights`]. Missing flags count as silent and extra
/// flags are ignored.
#[derive(Clone, Debug)]
pub struct ActivityHistory {
    smoothing: Smoothing,
    weights: Vec<f32>,
}

impl ActivityHistory {
    pub fn new(speakers: usize, policy: &HistoryPolicy) -> Self {
        let (smoothing, initial) = match *policy {
            HistoryPolicy::Exponential { gain } => (Smoothing::Exponential { gain }, 0.0),
            HistoryPolicy::Windowed {
                capacity,
                min_weight,
                shaping,
            } => (
                Smoothing::Windowed {
                    window: SampleWindow::new(speakers, capacity),
                    min_weight,
                    shaping,
                },
                shape_weight(0.0, min_weight, shaping),
            ),
        };
        Self {
            smoothing,
            weights: vec![initial; speakers],
        }
    }

    pub fn update(&mut self, flags: &[bool]) {
        match &mut self.smoothing {
            Smoothing::Exponential { gain } => {
                let gain = *gain;
                for (i, w) in self.weights.iter_mut().enumerate() {
                    let sample = if flags.get(i).copied().unwrap_or(false) {
                        1.0
                    } else {
                        0.0
                    };
                    *w = *w * gain + sample * (1.0 - gain);
                }
            }
            Smoothing::Windowed {
                window,
                min_weight,
                shaping,
            } => {
                window.push(flags);
                for (i, w) in self.weights.iter_mut().enumerate() {
                    *w = shape_weight(window.fraction(i), *min_weight, *shaping);
                }
            }
        }
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Unshaped fraction of talking samples in the window, or the smoothed
    /// value itself for the exponential policy.
    pub fn raw_fraction(&self, speaker: usize) -> f32 {
        match &self.smoothing {
            Smoothing::Exponential { .. } => self.weights.get(speaker).copied().unwrap_or(0.0),
            Smoothing::Windowed { window, .. } => window.fraction(speaker),
        }
    }

    /// Write cursor of the windowed policy.
    pub fn cursor(&self) -> Option<usize> {
        match &self.smoothing {
            Smoothing::Exponential { .. } => None,
            Smoothing::Windowed { window, .. } => Some(window.cursor),
        }
    }
}
