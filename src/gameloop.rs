//! A fixed-timestep foreground loop for driving the demo headlessly.

use std::thread;
use std::time::Duration;

// limit the tick debt a slow frame can accumulate to avoid a spiral of death
const MAX_ACC_VALUE: u128 = 1_000_000_000 / 8;

/// The state driven by a loop: ticks at a fixed timestep, draws once
/// per frame. Return None from `tick` to exit the loop.
pub trait TickState {
    fn tick(&mut self, dt: f64) -> Option<()>;
    fn draw(&mut self);
}

/// A loop that runs ticks in lockstep with wall-clock time,
/// sleeping between frames.
pub struct LockstepLoop {
    nanos_per_tick: u128,
    dt: f64,
}

impl LockstepLoop {
    pub fn from_fps(fps: u32) -> Self {
        LockstepLoop {
            nanos_per_tick: 1_000_000_000 / u128::from(fps),
            dt: 1.0 / f64::from(fps),
        }
    }

    pub fn run<S: TickState>(&self, initial_state: S) {
        let mut state = initial_state;
        let mut acc = 0;
        let mut prev_time = instant::Instant::now();
        'main: loop {
            acc += prev_time.elapsed().as_nanos();
            prev_time = instant::Instant::now();
            if acc > MAX_ACC_VALUE {
                acc = MAX_ACC_VALUE;
            }

            while acc >= self.nanos_per_tick {
                if state.tick(self.dt).is_none() {
                    break 'main;
                }
                acc -= self.nanos_per_tick;
            }

            state.draw();

            thread::sleep(Duration::from_nanos((self.nanos_per_tick - acc) as u64));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountDown {
        ticks_left: u32,
        draws: u32,
    }

    impl TickState for CountDown {
        fn tick(&mut self, dt: f64) -> Option<()> {
            assert!(dt > 0.0);
            self.ticks_left = self.ticks_left.checked_sub(1)?;
            Some(())
        }
        fn draw(&mut self) {
            self.draws += 1;
        }
    }

    #[test]
    fn the_loop_exits_when_tick_returns_none() {
        let lsl = LockstepLoop::from_fps(1000);
        // run() consumes the state, so exit is the only observable signal
        lsl.run(CountDown {
            ticks_left: 5,
            draws: 0,
        });
    }
}
