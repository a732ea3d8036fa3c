//! Synthetic motion sources used in place of hardware sensor fusion.

use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::time::Duration;

use super::{MotionSource, RawMotion};

/// A source that reports the same gravity and rotation rate every poll,
/// as if the device were held perfectly still.
#[derive(Clone, Copy, Debug)]
pub struct SteadyTilt {
    gravity: [f64; 3],
    rotation_rate: [f64; 3],
}

impl SteadyTilt {
    pub fn new(gravity: [f64; 3], rotation_rate: [f64; 3]) -> Self {
        Self {
            gravity,
            rotation_rate,
        }
    }
}

impl MotionSource for SteadyTilt {
    fn read(&mut self, elapsed: Duration) -> Option<RawMotion> {
        Some(RawMotion {
            timestamp: elapsed,
            gravity: self.gravity,
            rotation_rate: self.rotation_rate,
        })
    }
}

/// A source that sweeps the gravity vector around the unit circle,
/// as if the device were slowly rolled in a circle, with a constant
/// spin rate around the z axis.
#[derive(Clone, Copy, Debug)]
pub struct TiltCircle {
    /// Time for one full sweep of the gravity vector, in seconds.
    pub period: f64,
    /// Constant z rotation rate reported alongside the sweep.
    pub spin: f64,
}

impl MotionSource for TiltCircle {
    fn read(&mut self, elapsed: Duration) -> Option<RawMotion> {
        let angle = TAU * elapsed.as_secs_f64() / self.period;
        Some(RawMotion {
            timestamp: elapsed,
            gravity: [angle.cos(), angle.sin(), 0.0],
            rotation_rate: [0.0, 0.0, self.spin],
        })
    }
}

/// A source that plays back a pre-recorded list of readings, one per
/// poll, and then runs dry. Timestamps come from the script, which
/// makes this the source of choice in tests.
#[derive(Clone, Debug, Default)]
pub struct ScriptedMotion {
    frames: VecDeque<RawMotion>,
}

impl ScriptedMotion {
    pub fn new(frames: impl IntoIterator<Item = RawMotion>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl MotionSource for ScriptedMotion {
    fn read(&mut self, _elapsed: Duration) -> Option<RawMotion> {
        self.frames.pop_front()
    }
}
