//! Motion sensing: raw samples from a [`MotionSource`][self::MotionSource],
//! orientation correction into screen space, and the background sampler
//! that publishes corrected samples for the foreground thread.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::math as m;

pub mod orientation;
pub use orientation::{Orientation, OrientationCell};

pub mod sources;
pub use sources::{ScriptedMotion, SteadyTilt, TiltCircle};

//

/// A raw sensor reading: gravity and rotation rate as 3-axis triples
/// in the device's own coordinate frame.
#[derive(Clone, Copy, Debug)]
pub struct RawMotion {
    pub timestamp: Duration,
    pub gravity: [f64; 3],
    pub rotation_rate: [f64; 3],
}

/// A corrected sample ready to feed to the dynamics step:
/// screen-space gravity direction plus a damped angular velocity.
#[derive(Clone, Copy, Debug)]
pub struct MotionSample {
    /// Simulated "down" in screen space (+y points down).
    pub gravity_direction: m::Vec2,
    /// Spin to add to the tile's angular velocity, in radians per second.
    pub angular_velocity: f64,
    pub timestamp: Duration,
}

/// Something that produces motion readings when polled.
///
/// `elapsed` is the time since sampling started; synthetic sources use it
/// to evolve their signal. Returning None means no reading was available
/// this poll.
pub trait MotionSource {
    fn read(&mut self, elapsed: Duration) -> Option<RawMotion>;
}

/// Convert a raw device-frame reading into a screen-space sample.
///
/// The gravity (x, y) pair is adjusted for the screen orientation,
/// then the y axis is flipped to match screen coordinates.
pub fn correct(raw: &RawMotion, orientation: Orientation, spin_damping: f64) -> MotionSample {
    let adjusted = orientation.adjust(m::Vec2::new(raw.gravity[0], raw.gravity[1]));
    MotionSample {
        gravity_direction: m::Vec2::new(adjusted.x, -adjusted.y),
        angular_velocity: raw.rotation_rate[2] * spin_damping,
        timestamp: raw.timestamp,
    }
}

//
// feed
//

#[derive(Default)]
struct FeedInner {
    slot: Option<MotionSample>,
    last_stamp: Option<Duration>,
}

/// A single-slot handoff between the sampler thread and the foreground.
///
/// Holds at most one sample; publishing overwrites whatever the consumer
/// hasn't taken yet, so a slow consumer only ever sees the latest sample.
#[derive(Clone, Default)]
pub struct MotionFeed(Arc<Mutex<FeedInner>>);

impl MotionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a sample, replacing any unconsumed one.
    ///
    /// Samples must arrive in non-decreasing timestamp order; a sample
    /// older than the last published one is dropped. Returns whether the
    /// sample was accepted.
    pub fn publish(&self, sample: MotionSample) -> bool {
        let mut inner = self.0.lock();
        if let Some(last) = inner.last_stamp {
            if sample.timestamp < last {
                log::warn!(
                    "dropping out-of-order motion sample ({:?} < {:?})",
                    sample.timestamp,
                    last
                );
                return false;
            }
        }
        inner.last_stamp = Some(sample.timestamp);
        inner.slot = Some(sample);
        true
    }

    /// Take the latest sample, leaving the slot empty.
    pub fn take(&self) -> Option<MotionSample> {
        self.0.lock().slot.take()
    }

    /// Discard any unconsumed sample and forget the ordering watermark.
    /// Called when a new delivery run begins, since a fresh run restarts
    /// its timestamps from zero.
    pub fn reset(&self) {
        let mut inner = self.0.lock();
        inner.slot = None;
        inner.last_stamp = None;
    }
}

//
// sampler
//

#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("failed to spawn the motion sampling thread")]
    Spawn(#[from] std::io::Error),
    #[error("the motion source is still held by a previous run")]
    SourceBusy,
}

/// Polls a [`MotionSource`][self::MotionSource] on a background thread,
/// corrects each reading for the current screen orientation and publishes
/// the result into a [`MotionFeed`][self::MotionFeed].
pub struct MotionSampler {
    source: Option<Box<dyn MotionSource + Send>>,
    worker: Option<thread::JoinHandle<Box<dyn MotionSource + Send>>>,
    stop_flag: Arc<AtomicBool>,
    feed: MotionFeed,
    orientation: OrientationCell,
    interval: Duration,
    spin_damping: f64,
}

impl MotionSampler {
    pub fn new(
        source: Box<dyn MotionSource + Send>,
        orientation: OrientationCell,
        interval: Duration,
        spin_damping: f64,
    ) -> Self {
        Self {
            source: Some(source),
            worker: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            feed: MotionFeed::new(),
            orientation,
            interval,
            spin_damping,
        }
    }

    /// Begin periodic delivery of corrected samples.
    /// Does nothing if sampling is already running.
    pub fn start(&mut self) -> Result<(), SamplerError> {
        if self.worker.is_some() {
            return Ok(());
        }
        let mut source = self.source.take().ok_or(SamplerError::SourceBusy)?;
        self.stop_flag.store(false, Ordering::Relaxed);
        self.feed.reset();

        let stop = self.stop_flag.clone();
        let feed = self.feed.clone();
        let orientation = self.orientation.clone();
        let interval = self.interval;
        let spin_damping = self.spin_damping;

        let spawned = thread::Builder::new()
            .name("motion-sampler".into())
            .spawn(move || {
                let started = instant::Instant::now();
                while !stop.load(Ordering::Relaxed) {
                    match source.read(started.elapsed()) {
                        Some(raw) => {
                            let sample = correct(&raw, orientation.get(), spin_damping);
                            feed.publish(sample);
                        }
                        None => log::warn!("motion source produced no reading"),
                    }
                    thread::sleep(interval);
                }
                source
            });
        match spawned {
            Ok(handle) => {
                log::debug!("motion sampling started");
                self.worker = Some(handle);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Stop sampling, waiting for the worker to finish. Idempotent;
    /// the source is recovered so the sampler can be started again.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            match worker.join() {
                Ok(source) => self.source = Some(source),
                Err(_) => log::warn!("motion sampler thread panicked"),
            }
            log::debug!("motion sampling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Take the latest corrected sample if one has been published
    /// since the last take.
    pub fn take_sample(&self) -> Option<MotionSample> {
        self.feed.take()
    }
}

impl Drop for MotionSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::Rng;

    fn raw(gravity_xy: [f64; 2], rotation_z: f64) -> RawMotion {
        RawMotion {
            timestamp: Duration::ZERO,
            gravity: [gravity_xy[0], gravity_xy[1], 0.0],
            rotation_rate: [0.0, 0.0, rotation_z],
        }
    }

    #[test]
    fn adjustment_matches_the_orientation_table() {
        let v = m::Vec2::new(0.3, -0.7);
        let cases = [
            (Orientation::Portrait, m::Vec2::new(0.3, -0.7)),
            (Orientation::LandscapeLeft, m::Vec2::new(0.7, 0.3)),
            (Orientation::LandscapeRight, m::Vec2::new(-0.7, -0.3)),
            (Orientation::PortraitUpsideDown, m::Vec2::new(-0.3, 0.7)),
        ];
        for (orientation, expected) in cases {
            let adjusted = orientation.adjust(v);
            assert_abs_diff_eq!(adjusted.x, expected.x);
            assert_abs_diff_eq!(adjusted.y, expected.y);
        }
    }

    #[test]
    fn adjustment_preserves_vector_length() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let v = m::Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
            for orientation in [
                Orientation::Portrait,
                Orientation::LandscapeLeft,
                Orientation::LandscapeRight,
                Orientation::PortraitUpsideDown,
            ] {
                assert_abs_diff_eq!(orientation.adjust(v).mag(), v.mag(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn landscape_left_gravity_is_adjusted_then_flipped() {
        let sample = correct(&raw([1.0, 0.0], 0.0), Orientation::LandscapeLeft, 0.01);
        // (1, 0) adjusts to (0, 1), then the screen-space y flip gives (0, -1)
        assert_abs_diff_eq!(sample.gravity_direction.x, 0.0);
        assert_abs_diff_eq!(sample.gravity_direction.y, -1.0);
    }

    #[test]
    fn angular_velocity_is_linearly_damped() {
        let sample = correct(&raw([0.0, 1.0], 5.0), Orientation::Portrait, 0.01);
        assert_abs_diff_eq!(sample.angular_velocity, 0.05);
        let doubled = correct(&raw([0.0, 1.0], 10.0), Orientation::Portrait, 0.01);
        assert_abs_diff_eq!(doubled.angular_velocity, 2.0 * sample.angular_velocity);
    }

    fn sample_at(ms: u64) -> MotionSample {
        MotionSample {
            gravity_direction: m::Vec2::new(0.0, 1.0),
            angular_velocity: 0.0,
            timestamp: Duration::from_millis(ms),
        }
    }

    #[test]
    fn feed_keeps_only_the_latest_sample() {
        let feed = MotionFeed::new();
        assert!(feed.publish(sample_at(1)));
        assert!(feed.publish(sample_at(2)));
        let taken = feed.take().expect("a sample was published");
        assert_eq!(taken.timestamp, Duration::from_millis(2));
        assert!(feed.take().is_none());
    }

    #[test]
    fn feed_drops_regressing_timestamps() {
        let feed = MotionFeed::new();
        assert!(feed.publish(sample_at(10)));
        assert!(!feed.publish(sample_at(5)));
        // equal timestamps are fine (non-decreasing order)
        assert!(feed.publish(sample_at(10)));
    }

    #[test]
    fn sampler_stop_is_idempotent_and_restartable() {
        let source = SteadyTilt::new([0.0, 1.0, 0.0], [0.0, 0.0, 0.0]);
        let mut sampler = MotionSampler::new(
            Box::new(source),
            OrientationCell::new(Orientation::Portrait),
            Duration::from_millis(1),
            0.01,
        );

        sampler.start().expect("spawn");
        assert!(sampler.is_running());
        thread::sleep(Duration::from_millis(20));
        assert!(sampler.take_sample().is_some());

        sampler.stop();
        sampler.stop();
        assert!(!sampler.is_running());

        sampler.start().expect("restart");
        thread::sleep(Duration::from_millis(20));
        assert!(sampler.take_sample().is_some());
        sampler.stop();
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let source = SteadyTilt::new([0.0, 1.0, 0.0], [0.0, 0.0, 0.0]);
        let mut sampler = MotionSampler::new(
            Box::new(source),
            OrientationCell::new(Orientation::Portrait),
            Duration::from_millis(1),
            0.01,
        );
        sampler.start().expect("spawn");
        sampler.start().expect("second start is ok");
        sampler.stop();
    }
}
