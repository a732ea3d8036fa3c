//! The user-facing control surface: two actions and a status prompt.

use crate::animator::TiltAnimator;
use crate::config::Tuning;
use crate::motion::{MotionSource, OrientationCell, SamplerError};
use crate::stage::Stage;

pub const START_PROMPT: &str = "Select play button to start ...";
pub const RESET_PROMPT: &str = "... select the X to stop.";

pub struct App {
    pub stage: Stage,
    animator: TiltAnimator,
    prompt: &'static str,
}

impl App {
    pub fn new(
        tuning: Tuning,
        stage: Stage,
        source: Box<dyn MotionSource + Send>,
        orientation: OrientationCell,
    ) -> Self {
        let animator = TiltAnimator::new(tuning, source, orientation, stage.tile.home());
        App {
            stage,
            animator,
            prompt: START_PROMPT,
        }
    }

    /// The "play" action: begin the simulation and swap the prompt.
    pub fn press_start(&mut self) -> Result<(), SamplerError> {
        self.animator.start(&self.stage)?;
        self.prompt = RESET_PROMPT;
        Ok(())
    }

    /// The "stop" action: reset the simulation and restore the prompt.
    pub fn press_reset(&mut self) {
        self.animator.reset(&mut self.stage);
        self.prompt = START_PROMPT;
    }

    /// Advance the simulation and any return animation by one timestep.
    pub fn tick(&mut self, dt: f64) {
        self.animator.tick(&mut self.stage, dt);
        self.stage.tick(dt);
    }

    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    pub fn is_running(&self) -> bool {
        self.animator.is_running()
    }
}
