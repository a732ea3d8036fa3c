//! The stage is the container-view analog: reference bounds plus the
//! animated square tile with a home pose to return to.

use crate::animation::ReturnAnimation;
use crate::dynamics::Bounds;
use crate::math as m;

/// The animated square.
#[derive(Clone, Copy, Debug)]
pub struct Tile {
    /// Side length of the square, in points.
    pub side: f64,
    /// Current pose, overwritten from the proxy every step while the
    /// simulation runs.
    pub pose: m::Pose,
    home: m::Pose,
}

impl Tile {
    pub fn new(side: f64, home: m::Pose) -> Self {
        Tile {
            side,
            pose: home,
            home,
        }
    }

    /// The pose the tile rests at when no simulation is running.
    pub fn home(&self) -> m::Pose {
        self.home
    }
}

pub struct Stage {
    pub bounds: Bounds,
    pub tile: Tile,
    return_anim: Option<ReturnAnimation>,
}

impl Stage {
    /// A stage of the given size with the tile at home in the center.
    pub fn new(width: f64, height: f64, tile_side: f64) -> Self {
        let bounds = Bounds::new(width, height);
        let home = m::Pose::new(bounds.center(), m::Rotor2::identity());
        Stage {
            bounds,
            tile: Tile::new(tile_side, home),
            return_anim: None,
        }
    }

    /// Start easing the tile from wherever it is back to its home pose.
    /// Replaces any return animation already in flight.
    pub fn begin_return(&mut self, duration: f64) {
        self.return_anim = Some(ReturnAnimation::new(
            self.tile.pose,
            self.tile.home,
            duration,
        ));
    }

    pub fn is_returning(&self) -> bool {
        self.return_anim.is_some()
    }

    /// Advance the return animation if one is in flight.
    pub fn tick(&mut self, dt: f64) {
        if let Some(anim) = &mut self.return_anim {
            self.tile.pose = anim.tick(dt);
            if anim.is_finished() {
                self.return_anim = None;
            }
        }
    }
}
