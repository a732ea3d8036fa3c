//! The adapter between motion sensing and the dynamics engine.
//!
//! [`TiltAnimator`][self::TiltAnimator] owns the engine, the sampler
//! and the single proxy item; on every tick it applies the latest
//! motion sample, steps the engine and copies the proxy's transform
//! onto the stage's tile.

use crate::config::Tuning;
use crate::dynamics::{
    Collider, CollisionBehavior, DynamicAnimator, GravityBehavior, ItemBehavior, ProxyItem,
};
use crate::math as m;
use crate::motion::{MotionSampler, MotionSource, OrientationCell, SamplerError};
use crate::stage::Stage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnimatorState {
    Idle,
    Running,
}

pub struct TiltAnimator {
    engine: DynamicAnimator,
    sampler: MotionSampler,
    proxy: ProxyItem,
    tuning: Tuning,
    state: AnimatorState,
}

impl TiltAnimator {
    pub fn new(
        tuning: Tuning,
        source: Box<dyn MotionSource + Send>,
        orientation: OrientationCell,
        home: m::Pose,
    ) -> Self {
        TiltAnimator {
            engine: DynamicAnimator::new(tuning.substeps, tuning.gravity_scale),
            sampler: MotionSampler::new(
                source,
                orientation,
                tuning.sample_interval(),
                tuning.spin_damping,
            ),
            proxy: ProxyItem::anchored_at(home),
            tuning,
            state: AnimatorState::Idle,
        }
    }

    /// Install the behavior set bound to the proxy item and begin motion
    /// sampling. Does nothing when already running.
    pub fn start(&mut self, stage: &Stage) -> Result<(), SamplerError> {
        if self.state == AnimatorState::Running {
            return Ok(());
        }
        self.engine.set_gravity(GravityBehavior {
            direction: self.tuning.initial_gravity(),
        });
        self.engine.set_collision(CollisionBehavior {
            bounds: stage.bounds,
        });
        self.engine.set_item(ItemBehavior::new(
            Collider::new_square(stage.tile.side),
            self.tuning.friction,
            self.tuning.elasticity,
        ));
        self.sampler.start()?;
        self.state = AnimatorState::Running;
        log::debug!("tilt animator started");
        Ok(())
    }

    /// Stop sampling, clear all behaviors, start the tile's return
    /// animation and recreate the proxy anchored at the tile's home
    /// pose. Idempotent.
    pub fn reset(&mut self, stage: &mut Stage) {
        self.sampler.stop();
        self.engine.clear();
        stage.begin_return(self.tuning.return_duration);
        self.proxy = ProxyItem::anchored_at(stage.tile.home());
        self.state = AnimatorState::Idle;
        log::debug!("tilt animator reset");
    }

    /// Apply the latest motion sample, advance the simulation and copy
    /// the proxy's transform onto the tile. A no-op while idle.
    pub fn tick(&mut self, stage: &mut Stage, dt: f64) {
        if self.state != AnimatorState::Running {
            return;
        }
        if let Some(sample) = self.sampler.take_sample() {
            log::trace!(
                "applying sample: gravity {:?}, spin {}",
                sample.gravity_direction,
                sample.angular_velocity
            );
            // spin accumulates, gravity direction is fully replaced
            self.proxy.velocity.angular += sample.angular_velocity;
            if let Some(gravity) = self.engine.gravity_mut() {
                gravity.direction = sample.gravity_direction;
            }
        }
        self.engine.step(&mut self.proxy, dt);
        stage.tile.pose = self.proxy.pose;
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimatorState::Running
    }

    /// The gravity behavior's current direction, if the behavior is installed.
    pub fn gravity_direction(&self) -> Option<m::Vec2> {
        self.engine.gravity_direction()
    }

    pub fn proxy(&self) -> &ProxyItem {
        &self.proxy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Orientation, RawMotion, ScriptedMotion};
    use approx::assert_abs_diff_eq;
    use std::time::Duration;

    fn test_tuning() -> Tuning {
        Tuning {
            sample_interval_ms: 1,
            ..Tuning::default()
        }
    }

    fn scripted(frames: Vec<RawMotion>) -> Box<ScriptedMotion> {
        Box::new(ScriptedMotion::new(frames))
    }

    fn animator_with(frames: Vec<RawMotion>, stage: &Stage) -> TiltAnimator {
        TiltAnimator::new(
            test_tuning(),
            scripted(frames),
            OrientationCell::new(Orientation::Portrait),
            stage.tile.home(),
        )
    }

    #[test]
    fn reset_anchors_the_proxy_at_home_with_zero_velocity() {
        let mut stage = Stage::new(320.0, 480.0, 100.0);
        let mut animator = animator_with(Vec::new(), &stage);
        animator.start(&stage).expect("start");
        for _ in 0..30 {
            animator.tick(&mut stage, 1.0 / 60.0);
        }
        animator.reset(&mut stage);

        let home = stage.tile.home();
        let proxy = animator.proxy();
        assert_eq!(proxy.pose.translation, home.translation);
        assert_eq!(proxy.velocity.linear, m::Vec2::zero());
        assert_eq!(proxy.velocity.angular, 0.0);
        assert!(!animator.is_running());
    }

    #[test]
    fn reset_twice_matches_reset_once() {
        let mut stage = Stage::new(320.0, 480.0, 100.0);
        let mut animator = animator_with(Vec::new(), &stage);
        animator.start(&stage).expect("start");
        animator.tick(&mut stage, 1.0 / 60.0);

        animator.reset(&mut stage);
        let once_proxy = *animator.proxy();
        let once_gravity = animator.gravity_direction();

        animator.reset(&mut stage);
        assert_eq!(
            animator.proxy().pose.translation,
            once_proxy.pose.translation
        );
        assert_eq!(animator.gravity_direction(), once_gravity);
        assert!(!animator.is_running());
    }

    #[test]
    fn ticking_while_idle_leaves_the_tile_alone() {
        let mut stage = Stage::new(320.0, 480.0, 100.0);
        let mut animator = animator_with(Vec::new(), &stage);
        let before = stage.tile.pose;
        animator.tick(&mut stage, 1.0 / 60.0);
        assert_eq!(stage.tile.pose.translation, before.translation);
    }

    #[test]
    fn samples_replace_gravity_and_accumulate_spin() {
        let mut stage = Stage::new(320.0, 480.0, 100.0);
        // two sideways-gravity frames with steady spin
        let frames = vec![
            RawMotion {
                timestamp: Duration::from_millis(0),
                gravity: [1.0, 0.0, 0.0],
                rotation_rate: [0.0, 0.0, 5.0],
            },
            RawMotion {
                timestamp: Duration::from_millis(5),
                gravity: [1.0, 0.0, 0.0],
                rotation_rate: [0.0, 0.0, 5.0],
            },
        ];
        let mut animator = animator_with(frames, &stage);
        animator.start(&stage).expect("start");

        // let the sampler drain the script
        std::thread::sleep(Duration::from_millis(30));
        animator.tick(&mut stage, 1.0 / 60.0);

        // portrait, raw (1, 0): adjusted (1, 0), delivered direction (1, 0)
        let gravity = animator.gravity_direction().expect("behavior installed");
        assert_abs_diff_eq!(gravity.x, 1.0);
        assert_abs_diff_eq!(gravity.y, 0.0);
        // the single-slot feed only delivers the latest sample, so one
        // impulse of 5.0 * 0.01 has been applied before the engine stepped
        assert!(animator.proxy().velocity.angular != 0.0);
        // gravity now points right, so the tile drifts that way
        assert!(stage.tile.pose.translation.x > stage.tile.home().translation.x);
    }

    #[test]
    fn start_while_running_keeps_the_simulation_going() {
        let mut stage = Stage::new(320.0, 480.0, 100.0);
        let mut animator = animator_with(Vec::new(), &stage);
        animator.start(&stage).expect("start");
        for _ in 0..10 {
            animator.tick(&mut stage, 1.0 / 60.0);
        }
        let mid_flight = animator.proxy().pose;
        animator.start(&stage).expect("second start");
        assert_eq!(
            animator.proxy().pose.translation,
            mid_flight.translation,
            "a second start must not re-anchor the proxy"
        );
    }
}
