// Physics system: AABB rigid bodies on a fixed timestep

pub mod body;
pub mod collision;
mod debug;
mod world;

pub use body::{presets, BodyBuilder, RigidBody2D};
pub use collision::CollisionEvent;
pub use debug::PhysicsDebugDraw;
pub use world::{PhysicsSettings, PhysicsWorld, FIXED_TIMESTEP};
