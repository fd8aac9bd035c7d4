use glam::Vec2;

use crate::core::math::Aabb;

/// Physical state of a single 2D body
///
/// Rotation is frozen: bodies only translate, and their collision shape is
/// always the axis-aligned box `position ± size / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody2D {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,

    /// Force accumulated since the last step, cleared after every step
    pub force: Vec2,

    pub mass: f32,
    /// Bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
    pub friction: f32,
    /// Fraction of velocity removed on every fixed step
    pub linear_damping: f32,

    pub use_gravity: bool,
    pub is_static: bool,
    /// Triggers are skipped by collision response
    pub is_trigger: bool,

    pub freeze_x: bool,
    pub freeze_y: bool,

    /// Full width and height of the bounding box
    pub size: Vec2,

    pub enabled: bool,
}

impl RigidBody2D {
    /// Create a dynamic body at `position` with the given mass
    pub fn new(position: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            restitution: 0.5,
            friction: 0.1,
            linear_damping: 0.01,
            use_gravity: true,
            is_static: false,
            is_trigger: false,
            freeze_x: false,
            freeze_y: false,
            size: Vec2::ONE,
            enabled: true,
        }
    }

    /// Accumulate a force for the next step
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Change velocity immediately; ignored for static or massless bodies
    pub fn add_impulse(&mut self, impulse: Vec2) {
        if !self.is_static && self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }

    /// Bounding box centred on the body's position
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    /// Inverse mass used by collision response (0 means immovable)
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Whether the integrator moves this body
    pub fn is_simulated(&self) -> bool {
        self.enabled && !self.is_static
    }
}

impl Default for RigidBody2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body: RigidBody2D,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn dynamic(position: Vec2, mass: f32) -> Self {
        Self {
            body: RigidBody2D::new(position, mass),
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn fixed(position: Vec2) -> Self {
        let mut body = RigidBody2D::new(position, 1.0);
        body.is_static = true;
        body.use_gravity = false;
        Self { body }
    }

    /// Set the full size of the bounding box
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.body.size = Vec2::new(width, height);
        self
    }

    /// Set the initial linear velocity
    pub fn velocity(mut self, x: f32, y: f32) -> Self {
        self.body.velocity = Vec2::new(x, y);
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: f32) -> Self {
        self.body.restitution = restitution;
        self
    }

    /// Set friction coefficient (0.0 = no friction)
    pub fn friction(mut self, friction: f32) -> Self {
        self.body.friction = friction;
        self
    }

    /// Set the per-step velocity damping
    pub fn linear_damping(mut self, damping: f32) -> Self {
        self.body.linear_damping = damping;
        self
    }

    /// Set whether world gravity applies
    pub fn gravity(mut self, use_gravity: bool) -> Self {
        self.body.use_gravity = use_gravity;
        self
    }

    /// Make this a trigger (detects overlaps but never collides)
    pub fn trigger(mut self, is_trigger: bool) -> Self {
        self.body.is_trigger = is_trigger;
        self
    }

    /// Lock translation in X axis
    pub fn lock_x(mut self) -> Self {
        self.body.freeze_x = true;
        self
    }

    /// Lock translation in Y axis
    pub fn lock_y(mut self) -> Self {
        self.body.freeze_y = true;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody2D {
        self.body
    }
}

/// Common rigid body configurations for game objects
pub mod presets {
    use super::*;

    /// Create a static ground slab
    pub fn ground(x: f32, y: f32, width: f32, height: f32) -> RigidBody2D {
        BodyBuilder::fixed(Vec2::new(x, y))
            .size(width, height)
            .restitution(0.8)
            .build()
    }

    /// Create a small falling square
    pub fn falling_square(x: f32, y: f32, side: f32, mass: f32) -> RigidBody2D {
        BodyBuilder::dynamic(Vec2::new(x, y), mass)
            .size(side, side)
            .restitution(0.6)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let body = RigidBody2D::new(Vec2::new(1.0, 2.0), 1.0);

        assert_eq!(body.position, Vec2::new(1.0, 2.0));
        assert_eq!(body.restitution, 0.5);
        assert_eq!(body.friction, 0.1);
        assert_eq!(body.linear_damping, 0.01);
        assert_eq!(body.size, Vec2::ONE);
        assert!(body.use_gravity);
        assert!(body.enabled);
        assert!(!body.is_static);
    }

    #[test]
    fn test_add_force_accumulates() {
        let mut body = RigidBody2D::default();
        body.add_force(Vec2::new(1.0, 0.0));
        body.add_force(Vec2::new(0.0, 2.0));
        assert_eq!(body.force, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_add_impulse_divides_by_mass() {
        let mut body = RigidBody2D::new(Vec2::ZERO, 2.0);
        body.add_impulse(Vec2::new(4.0, -2.0));
        assert_eq!(body.velocity, Vec2::new(2.0, -1.0));
    }

    #[test]
    fn test_add_impulse_ignored_for_static_and_massless() {
        let mut fixed = BodyBuilder::fixed(Vec2::ZERO).build();
        fixed.add_impulse(Vec2::new(10.0, 10.0));
        assert_eq!(fixed.velocity, Vec2::ZERO);

        let mut massless = RigidBody2D::new(Vec2::ZERO, 0.0);
        massless.add_impulse(Vec2::new(10.0, 10.0));
        assert_eq!(massless.velocity, Vec2::ZERO);

        let mut negative = RigidBody2D::new(Vec2::ZERO, -1.0);
        negative.add_impulse(Vec2::new(10.0, 10.0));
        assert_eq!(negative.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_bounds() {
        let body = BodyBuilder::dynamic(Vec2::new(2.0, 3.0), 1.0)
            .size(4.0, 2.0)
            .build();
        let bounds = body.bounds();
        assert_eq!(bounds.min, Vec2::new(0.0, 2.0));
        assert_eq!(bounds.max, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn test_inverse_mass() {
        assert_eq!(RigidBody2D::new(Vec2::ZERO, 4.0).inverse_mass(), 0.25);
        assert_eq!(RigidBody2D::new(Vec2::ZERO, 0.0).inverse_mass(), 0.0);
        assert_eq!(BodyBuilder::fixed(Vec2::ZERO).build().inverse_mass(), 0.0);
    }

    #[test]
    fn test_body_builder_dynamic() {
        let body = BodyBuilder::dynamic(Vec2::new(10.0, 20.0), 3.0)
            .velocity(5.0, 0.0)
            .friction(0.3)
            .lock_x()
            .build();

        assert!(!body.is_static);
        assert_eq!(body.mass, 3.0);
        assert_eq!(body.velocity, Vec2::new(5.0, 0.0));
        assert_eq!(body.friction, 0.3);
        assert!(body.freeze_x);
        assert!(!body.freeze_y);
    }

    #[test]
    fn test_ground_preset() {
        let ground = presets::ground(0.0, -1.0, 10.0, 0.5);

        assert!(ground.is_static);
        assert!(!ground.is_simulated());
        assert_eq!(ground.restitution, 0.8);
        assert_eq!(ground.size, Vec2::new(10.0, 0.5));
    }
}
