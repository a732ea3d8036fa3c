//! tiltbox is a small headless demo of motion-driven dynamics:
//! device tilt redirects simulated gravity acting on a square tile,
//! device spin adds angular velocity impulses, and a rigid-body step
//! animates the tile inside the stage bounds.

pub mod animation;
pub use animation::ReturnAnimation;

pub mod animator;
pub use animator::TiltAnimator;

pub mod app;
pub use app::App;

pub mod config;
pub use config::Tuning;

pub mod dynamics;
pub use dynamics::{
    Bounds, Collider, CollisionBehavior, DynamicAnimator, GravityBehavior, ItemBehavior, Mass,
    ProxyItem, Velocity,
};

pub mod gameloop;
pub use gameloop::{LockstepLoop, TickState};

pub mod math;
pub use math::{uv, Angle, Pose, PoseBuilder, Rotor2, Unit, Vec2};

pub mod motion;
pub use motion::{
    MotionFeed, MotionSample, MotionSampler, MotionSource, Orientation, OrientationCell, RawMotion,
    SamplerError,
};

pub mod stage;
pub use stage::{Stage, Tile};
