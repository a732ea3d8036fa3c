//! A small rigid-body dynamics engine animating one proxy item inside
//! reference bounds. Stands in for the host platform's dynamics engine:
//! a gravity behavior, a bounds-collision behavior and an item behavior
//! carrying surface material properties.

use crate::math as m;

mod solver;

//

/// Velocity of the proxy item.
// Equivalent to a Vec3 but with names for the translational and rotational part.
#[derive(Clone, Copy, Debug)]
pub struct Velocity {
    /// Linear velocity in points per second.
    pub linear: m::Vec2,
    /// Angular velocity in radians per second.
    pub angular: f64,
}

impl Default for Velocity {
    fn default() -> Self {
        Velocity {
            linear: m::Vec2::zero(),
            angular: 0.0,
        }
    }
}

impl Velocity {
    /// Get the linear velocity of a point offset from the center of mass.
    pub fn point_velocity(&self, offset: m::Vec2) -> m::Vec2 {
        let tangent = m::left_normal(offset) * self.angular;
        self.linear + tangent
    }

    pub fn apply_to_pose(&self, dt: f64, mut pose: m::Pose) -> m::Pose {
        let scaled = *self * dt;
        pose.append_translation(scaled.linear);
        pose.prepend_rotation(m::Angle::Rad(scaled.angular).into());
        pose
    }
}

impl std::ops::Add for Velocity {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            linear: self.linear + other.linear,
            angular: self.angular + other.angular,
        }
    }
}
impl std::ops::AddAssign for Velocity {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
impl std::ops::Mul<f64> for Velocity {
    type Output = Velocity;

    fn mul(self, rhs: f64) -> Self::Output {
        Velocity {
            linear: self.linear * rhs,
            angular: self.angular * rhs,
        }
    }
}

/// The shape of the animated item, a rectangle stored as half-extents.
#[derive(Clone, Copy, Debug)]
pub struct Collider {
    pub half_extents: m::Vec2,
}

impl Collider {
    pub fn new_square(side: f64) -> Self {
        Self::new_rect(side, side)
    }

    pub fn new_rect(width: f64, height: f64) -> Self {
        Collider {
            half_extents: m::Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn area(&self) -> f64 {
        4.0 * self.half_extents.x * self.half_extents.y
    }

    /// Moment of inertia of the shape per unit mass.
    pub fn moment_of_inertia_coef(&self) -> f64 {
        let he = self.half_extents;
        (he.x * he.x + he.y * he.y) / 3.0
    }

    /// The corner offsets from the center, in local space.
    pub fn corners(&self) -> [m::Vec2; 4] {
        let he = self.half_extents;
        [
            m::Vec2::new(-he.x, -he.y),
            m::Vec2::new(he.x, -he.y),
            m::Vec2::new(he.x, he.y),
            m::Vec2::new(-he.x, he.y),
        ]
    }
}

/// This stores both a mass value and its inverse, because the inverse
/// is what the solver actually needs every iteration.
#[derive(Clone, Copy, Debug)]
pub struct Mass {
    mass: f64,
    inverse: f64,
}

impl Mass {
    pub fn new(mass: f64) -> Self {
        Mass {
            mass,
            inverse: 1.0 / mass,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv(&self) -> f64 {
        self.inverse
    }
}

/// Axis-aligned reference bounds in screen space: the origin is the
/// top left corner and +y points down.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub min: m::Vec2,
    pub max: m::Vec2,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Bounds {
            min: m::Vec2::zero(),
            max: m::Vec2::new(width, height),
        }
    }

    pub fn center(&self) -> m::Vec2 {
        (self.min + self.max) / 2.0
    }

    /// The four boundary walls as (point on wall, inward normal) pairs.
    pub fn walls(&self) -> [(m::Vec2, m::Unit<m::Vec2>); 4] {
        [
            (self.min, m::Unit::unit_x()),
            (self.max, -m::Unit::unit_x()),
            (self.min, m::Unit::unit_y()),
            (self.max, -m::Unit::unit_y()),
        ]
    }
}

/// The simulation stand-in for the animated view. Its pose is the sole
/// source of truth copied back onto the real tile every step.
#[derive(Clone, Copy, Debug)]
pub struct ProxyItem {
    pub pose: m::Pose,
    pub velocity: Velocity,
}

impl ProxyItem {
    /// A fresh proxy at rest at the given pose.
    pub fn anchored_at(pose: m::Pose) -> Self {
        ProxyItem {
            pose,
            velocity: Velocity::default(),
        }
    }
}

//
// behaviors
//

/// Constant acceleration along a direction vector. The magnitude of the
/// vector scales the acceleration, so (0, 2) is twice standard gravity
/// pointing down the screen.
#[derive(Clone, Copy, Debug)]
pub struct GravityBehavior {
    pub direction: m::Vec2,
}

/// Collision of the item against the reference bounds' walls.
#[derive(Clone, Copy, Debug)]
pub struct CollisionBehavior {
    pub bounds: Bounds,
}

/// The body definition: shape, mass and surface material of the item.
#[derive(Clone, Copy, Debug)]
pub struct ItemBehavior {
    pub collider: Collider,
    pub friction: f64,
    pub elasticity: f64,
    mass: Mass,
    moment_of_inertia: Mass,
}

impl ItemBehavior {
    /// Build a body from its collider with unit density.
    pub fn new(collider: Collider, friction: f64, elasticity: f64) -> Self {
        let mass = collider.area();
        ItemBehavior {
            collider,
            friction,
            elasticity,
            mass: Mass::new(mass),
            moment_of_inertia: Mass::new(collider.moment_of_inertia_coef() * mass),
        }
    }

    pub fn inverse_mass(&self) -> f64 {
        self.mass.inv()
    }

    pub fn inverse_moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia.inv()
    }
}

//

/// The dynamics engine: a set of behaviors and a substepped solver that
/// advances a [`ProxyItem`][self::ProxyItem] through them.
#[derive(Clone, Copy, Debug)]
pub struct DynamicAnimator {
    gravity: Option<GravityBehavior>,
    collision: Option<CollisionBehavior>,
    item: Option<ItemBehavior>,
    pub substeps: usize,
    /// Acceleration in points/s² produced by a unit-length gravity direction.
    pub gravity_scale: f64,
}

impl DynamicAnimator {
    pub fn new(substeps: usize, gravity_scale: f64) -> Self {
        DynamicAnimator {
            gravity: None,
            collision: None,
            item: None,
            substeps,
            gravity_scale,
        }
    }

    pub fn set_gravity(&mut self, behavior: GravityBehavior) {
        self.gravity = Some(behavior);
    }

    pub fn gravity_mut(&mut self) -> Option<&mut GravityBehavior> {
        self.gravity.as_mut()
    }

    pub fn gravity_direction(&self) -> Option<m::Vec2> {
        self.gravity.map(|g| g.direction)
    }

    pub fn set_collision(&mut self, behavior: CollisionBehavior) {
        self.collision = Some(behavior);
    }

    pub fn set_item(&mut self, behavior: ItemBehavior) {
        self.item = Some(behavior);
    }

    /// Remove all behaviors, leaving the engine inert.
    pub fn clear(&mut self) {
        log::debug!("clearing all dynamics behaviors");
        self.gravity = None;
        self.collision = None;
        self.item = None;
    }

    /// Advance the proxy by one tick. Without an item behavior there is
    /// no body definition and the engine does not step; without a gravity
    /// behavior no external force applies; without a collision behavior
    /// the proxy moves unobstructed.
    pub fn step(&mut self, proxy: &mut ProxyItem, dt: f64) {
        let Some(item) = &self.item else {
            return;
        };
        solver::step(
            proxy,
            item,
            self.gravity.as_ref(),
            self.collision.as_ref(),
            self.gravity_scale,
            self.substeps,
            dt,
        );
    }
}
