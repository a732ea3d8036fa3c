//! Interpolation methods and the tile's return-to-home animation.
//!
//! All interpolation functions here assume `t` moves from 0 to 1.

use std::ops::{Add, Mul};

use crate::math as m;

/// Linear interpolation.
pub fn lerp<T>(start: T, end: T, t: f64) -> T
where
    T: Copy + Mul<f64, Output = T> + Add<T, Output = T>,
{
    start * (1.0 - t) + end * t
}

/// Cubic ease-in-out with zero tangents at both endpoints.
pub fn ease_in_out(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// A fixed-duration pose tween that returns the tile to its home pose
/// after the simulation is reset.
#[derive(Clone, Copy, Debug)]
pub struct ReturnAnimation {
    from: m::Pose,
    to: m::Pose,
    duration: f64,
    elapsed: f64,
}

impl ReturnAnimation {
    pub fn new(from: m::Pose, to: m::Pose, duration: f64) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance the animation and get the pose for the new time.
    ///
    /// Time is clamped to the duration, so the final returned pose
    /// is exactly the target pose.
    pub fn tick(&mut self, dt: f64) -> m::Pose {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };
        self.sample(ease_in_out(t))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn sample(&self, s: f64) -> m::Pose {
        let position = lerp(self.from.translation, self.to.translation, s);
        let from_angle = m::Angle::from(self.from.rotation).rad();
        let to_angle = m::Angle::from(self.to.rotation).rad();
        let rotation = m::Rotor2::from_angle(lerp(from_angle, to_angle, s));
        m::Pose::new(position, rotation)
    }
}
