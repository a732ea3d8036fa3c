//! Screen orientation and the quarter-turn gravity adjustment for it.

use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use crate::math as m;

/// The orientation of the screen relative to the device's native portrait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Orientation {
    Portrait = 0,
    PortraitUpsideDown = 1,
    LandscapeLeft = 2,
    LandscapeRight = 3,
}

impl Orientation {
    /// Rotate a device-frame gravity (x, y) pair into the screen's frame.
    ///
    /// The landscape cases are quarter turns; upside down is a half turn.
    #[inline]
    pub fn adjust(self, v: m::Vec2) -> m::Vec2 {
        match self {
            Orientation::Portrait => v,
            Orientation::LandscapeLeft => m::left_normal(v),
            Orientation::LandscapeRight => m::right_normal(v),
            Orientation::PortraitUpsideDown => -v,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Orientation::PortraitUpsideDown,
            2 => Orientation::LandscapeLeft,
            3 => Orientation::LandscapeRight,
            _ => Orientation::Portrait,
        }
    }
}

/// A shared cell holding the current screen orientation.
///
/// The stand-in for the host environment's orientation query: the
/// foreground sets it, the sampler thread reads it at sample time.
#[derive(Clone)]
pub struct OrientationCell(Arc<AtomicU8>);

impl OrientationCell {
    pub fn new(initial: Orientation) -> Self {
        Self(Arc::new(AtomicU8::new(initial as u8)))
    }

    pub fn get(&self) -> Orientation {
        Orientation::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, orientation: Orientation) {
        self.0.store(orientation as u8, Ordering::Relaxed);
    }
}

impl Default for OrientationCell {
    fn default() -> Self {
        Self::new(Orientation::Portrait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_roundtrips_every_orientation() {
        let cell = OrientationCell::default();
        for orientation in [
            Orientation::Portrait,
            Orientation::PortraitUpsideDown,
            Orientation::LandscapeLeft,
            Orientation::LandscapeRight,
        ] {
            cell.set(orientation);
            assert_eq!(cell.get(), orientation);
        }
    }

    #[test]
    fn clones_share_the_same_cell() {
        let cell = OrientationCell::default();
        let other = cell.clone();
        other.set(Orientation::LandscapeRight);
        assert_eq!(cell.get(), Orientation::LandscapeRight);
    }
}
