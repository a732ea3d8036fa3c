//! A scripted run of the tilt demo: start the simulation, sweep the
//! device in a circle, flip the screen orientation mid-run, then reset.
//! The stage is drawn to the terminal as an ASCII grid each frame.
//!
//! Pass a path to a RON file to override the default tuning, e.g.
//! `cargo run --example tiltdemo demos/tuning.ron`.

use tiltbox::{
    motion::TiltCircle, App, LockstepLoop, Orientation, OrientationCell, Stage, TickState, Tuning,
};

const FPS: u32 = 60;
const GRID_COLS: usize = 32;
const GRID_ROWS: usize = 12;

struct Demo {
    app: App,
    orientation: OrientationCell,
    elapsed: f64,
    started: bool,
    flipped: bool,
    reset: bool,
}

impl TickState for Demo {
    fn tick(&mut self, dt: f64) -> Option<()> {
        self.elapsed += dt;
        if !self.started && self.elapsed >= 0.5 {
            self.started = true;
            if let Err(err) = self.app.press_start() {
                eprintln!("could not start the simulation: {}", err);
                return None;
            }
        }
        if !self.flipped && self.elapsed >= 3.0 {
            self.flipped = true;
            self.orientation.set(Orientation::LandscapeLeft);
        }
        if !self.reset && self.elapsed >= 6.0 {
            self.reset = true;
            self.app.press_reset();
        }
        if self.elapsed >= 7.5 {
            return None;
        }
        self.app.tick(dt);
        Some(())
    }

    fn draw(&mut self) {
        let bounds = self.app.stage.bounds;
        let pos = self.app.stage.tile.pose.translation;
        let col = ((pos.x - bounds.min.x) / (bounds.max.x - bounds.min.x) * GRID_COLS as f64)
            .clamp(0.0, (GRID_COLS - 1) as f64) as usize;
        let row = ((pos.y - bounds.min.y) / (bounds.max.y - bounds.min.y) * GRID_ROWS as f64)
            .clamp(0.0, (GRID_ROWS - 1) as f64) as usize;

        // redraw in place: move the cursor up over the previous frame
        print!("\x1b[{}A", GRID_ROWS + 3);
        println!("{:<60}", self.app.prompt());
        println!("+{}+", "-".repeat(GRID_COLS));
        for r in 0..GRID_ROWS {
            let mut line = String::with_capacity(GRID_COLS);
            for c in 0..GRID_COLS {
                line.push(if r == row && c == col { '#' } else { ' ' });
            }
            println!("|{}|", line);
        }
        println!("+{}+", "-".repeat(GRID_COLS));
    }
}

fn load_tuning() -> Tuning {
    let Some(path) = std::env::args().nth(1) else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(contents) => match ron::from_str(&contents) {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!("ignoring malformed tuning file {}: {}", path, err);
                Tuning::default()
            }
        },
        Err(err) => {
            eprintln!("could not read tuning file {}: {}", path, err);
            Tuning::default()
        }
    }
}

fn main() {
    let tuning = load_tuning();
    let orientation = OrientationCell::new(Orientation::Portrait);
    let source = TiltCircle {
        period: 4.0,
        spin: 2.0,
    };
    let app = App::new(
        tuning,
        Stage::new(320.0, 480.0, 100.0),
        Box::new(source),
        orientation.clone(),
    );

    // reserve space for the in-place redraw
    for _ in 0..GRID_ROWS + 3 {
        println!();
    }

    LockstepLoop::from_fps(FPS).run(Demo {
        app,
        orientation,
        elapsed: 0.0,
        started: false,
        flipped: false,
        reset: false,
    });
    println!("done.");
}
