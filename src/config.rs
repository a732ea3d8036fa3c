//! Tuning parameters for the demo.
//!
//! These are hand-tuned values for visually plausible motion,
//! kept configurable rather than hard-coded.

use crate::math as m;

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct Tuning {
    /// Initial gravity direction in screen space (+y is down).
    /// Magnitude above 1 makes gravity stronger than the sensor reports.
    pub gravity_direction: [f64; 2],
    /// Acceleration in points per second squared produced by a
    /// gravity direction vector of unit length.
    pub gravity_scale: f64,
    /// Friction coefficient of the tile against the stage bounds.
    pub friction: f64,
    /// Restitution coefficient of the tile against the stage bounds.
    pub elasticity: f64,
    /// Scaling applied to the sensor's z rotation rate before it is
    /// added to the tile's angular velocity.
    pub spin_damping: f64,
    /// Interval between motion sensor polls, in milliseconds.
    pub sample_interval_ms: u64,
    /// Duration of the return-to-home animation after a reset, in seconds.
    pub return_duration: f64,
    /// Physics substeps per tick.
    pub substeps: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_direction: [0.0, 2.0],
            gravity_scale: 1000.0,
            friction: 0.1,
            elasticity: 0.5,
            spin_damping: 0.01,
            sample_interval_ms: 16,
            return_duration: 0.2,
            substeps: 10,
        }
    }
}

impl Tuning {
    pub fn initial_gravity(&self) -> m::Vec2 {
        m::Vec2::new(self.gravity_direction[0], self.gravity_direction[1])
    }

    pub fn sample_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.sample_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_constants() {
        let tuning = Tuning::default();
        assert_eq!(tuning.initial_gravity(), m::Vec2::new(0.0, 2.0));
        assert_eq!(tuning.friction, 0.1);
        assert_eq!(tuning.elasticity, 0.5);
        assert_eq!(tuning.spin_damping, 0.01);
        assert_eq!(tuning.return_duration, 0.2);
    }

    #[cfg(feature = "serde-types")]
    #[test]
    fn partial_ron_override_keeps_other_defaults() {
        let tuning: Tuning = ron::from_str("(elasticity: 0.8)").expect("valid tuning");
        assert_eq!(tuning.elasticity, 0.8);
        assert_eq!(tuning.friction, Tuning::default().friction);
    }
}
