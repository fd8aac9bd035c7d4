use glam::Vec2;
use log::{debug, info, warn};

use super::body::RigidBody2D;
use super::collision::{self, CollisionEvent};
use crate::engine::entity::EntityId;

/// Default fixed simulation step (60 Hz)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Default gravity (-9.81 m/s² in y-axis)
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.81);

/// Tunable parameters of a physics world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
    pub fixed_timestep: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            fixed_timestep: FIXED_TIMESTEP,
        }
    }
}

/// A body registered with the world, keyed by its owning entity
#[derive(Debug, Clone)]
struct BodyEntry {
    entity: EntityId,
    body: RigidBody2D,
}

/// Physics world that manages all physics simulation
///
/// Bodies are simulated in insertion order, which is also the order in which
/// colliding pairs are resolved.
pub struct PhysicsWorld {
    /// Gravity vector, read at the start of every step
    gravity: Vec2,

    /// Size of one simulation step in seconds
    fixed_timestep: f32,

    /// Frame time not yet consumed by a fixed step
    accumulator: f32,

    /// Registered bodies in insertion order
    bodies: Vec<BodyEntry>,

    /// Collision events from the last `advance` or `step` call
    events: Vec<CollisionEvent>,

    /// Total fixed steps executed
    step_count: u64,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_settings(PhysicsSettings::default())
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self::with_settings(PhysicsSettings {
            gravity,
            ..PhysicsSettings::default()
        })
    }

    /// Create a new physics world from explicit settings
    pub fn with_settings(mut settings: PhysicsSettings) -> Self {
        if !(settings.fixed_timestep > 0.0) {
            warn!(
                "Invalid fixed timestep {}, using {}",
                settings.fixed_timestep, FIXED_TIMESTEP
            );
            settings.fixed_timestep = FIXED_TIMESTEP;
        }

        info!(
            "Physics world created (gravity {:?}, step {:.4}s)",
            settings.gravity, settings.fixed_timestep
        );

        Self {
            gravity: settings.gravity,
            fixed_timestep: settings.fixed_timestep,
            accumulator: 0.0,
            bodies: Vec::new(),
            events: Vec::with_capacity(32),
            step_count: 0,
        }
    }

    /// Register a body for an entity
    ///
    /// Returns `false` and leaves the world unchanged if the entity already
    /// has a body.
    pub fn add_body(&mut self, entity: EntityId, body: RigidBody2D) -> bool {
        if self.index_of(entity).is_some() {
            debug!("Entity {} already has a body, ignoring add", entity);
            return false;
        }

        if body.mass <= 0.0 && !body.is_static {
            warn!(
                "Body for entity {} has non-positive mass {}; it will not accelerate",
                entity, body.mass
            );
        }

        debug!("Added body for entity {} at {:?}", entity, body.position);
        self.bodies.push(BodyEntry { entity, body });
        true
    }

    /// Remove the body of an entity, if it has one
    pub fn remove_body(&mut self, entity: EntityId) -> Option<RigidBody2D> {
        let index = self.index_of(entity)?;
        debug!("Removed body for entity {}", entity);
        Some(self.bodies.remove(index).body)
    }

    /// Get a reference to a rigid body
    pub fn body(&self, entity: EntityId) -> Option<&RigidBody2D> {
        self.index_of(entity).map(|i| &self.bodies[i].body)
    }

    /// Get a mutable reference to a rigid body
    pub fn body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody2D> {
        let index = self.index_of(entity)?;
        Some(&mut self.bodies[index].body)
    }

    /// Check whether an entity has a registered body
    pub fn contains(&self, entity: EntityId) -> bool {
        self.index_of(entity).is_some()
    }

    /// Iterate over all bodies in simulation order
    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &RigidBody2D)> {
        self.bodies.iter().map(|entry| (entry.entity, &entry.body))
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn index_of(&self, entity: EntityId) -> Option<usize> {
        self.bodies.iter().position(|entry| entry.entity == entity)
    }

    /// Advance the simulation by a frame's worth of wall-clock time
    ///
    /// Runs as many fixed steps as the accumulated time allows and keeps the
    /// remainder for the next call. Returns the number of steps taken.
    /// Events from every step of this call are kept.
    ///
    /// `frame_delta` must be a bounded frame time (see
    /// `game_loop::clamp_frame_time`); the f32 accumulator cannot subtract
    /// one step from very large values.
    pub fn advance(&mut self, frame_delta: f32) -> u32 {
        self.events.clear();
        self.accumulator += frame_delta;

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep {
            self.run_step(self.fixed_timestep);
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }

        steps
    }

    /// Step the physics simulation forward by exactly `dt` seconds
    ///
    /// Replaces the event list with this step's events.
    pub fn step(&mut self, dt: f32) {
        self.events.clear();
        self.run_step(dt);
    }

    fn run_step(&mut self, dt: f32) {
        let gravity = self.gravity;

        for entry in &mut self.bodies {
            integrate(&mut entry.body, gravity, dt);
        }

        self.handle_collisions();
        self.step_count += 1;
    }

    /// Test every pair once and resolve overlaps in insertion order
    fn handle_collisions(&mut self) {
        let count = self.bodies.len();

        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = self.bodies.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];

                if let Some(event) = trigger_event(a, b) {
                    self.events.push(event);
                    continue;
                }

                if !collision::is_collidable_pair(&a.body, &b.body) {
                    continue;
                }

                if let Some(contact) = collision::resolve_collision(&mut a.body, &mut b.body) {
                    self.events.push(CollisionEvent::Contact {
                        a: a.entity,
                        b: b.entity,
                        normal: contact.normal,
                        penetration: contact.penetration,
                    });
                }
            }
        }
    }

    /// Collision events from the last `advance` or `step` call
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Set gravity for the physics world
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Get the fixed timestep
    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Time carried over to the next `advance` call
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Interpolation factor between the last two steps, in [0, 1)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_timestep
    }

    /// Total number of fixed steps executed
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Semi-implicit Euler step for one body
fn integrate(body: &mut RigidBody2D, gravity: Vec2, dt: f32) {
    if !body.is_simulated() {
        return;
    }

    body.acceleration = Vec2::ZERO;

    if body.use_gravity {
        body.force += gravity * body.mass;
    }

    if body.mass > 0.0 {
        body.acceleration = body.force / body.mass;
    }

    body.velocity += body.acceleration * dt;
    body.velocity *= 1.0 - body.linear_damping;

    let new_position = body.position + body.velocity * dt;
    if !body.freeze_x {
        body.position.x = new_position.x;
    }
    if !body.freeze_y {
        body.position.y = new_position.y;
    }

    body.force = Vec2::ZERO;
}

/// Overlap report for pairs involving exactly one enabled trigger
fn trigger_event(a: &BodyEntry, b: &BodyEntry) -> Option<CollisionEvent> {
    if !a.body.enabled || !b.body.enabled {
        return None;
    }

    let (trigger, other) = match (a.body.is_trigger, b.body.is_trigger) {
        (true, false) => (a, b),
        (false, true) => (b, a),
        _ => return None,
    };

    trigger
        .body
        .bounds()
        .overlaps(&other.body.bounds())
        .then_some(CollisionEvent::Trigger {
            trigger: trigger.entity,
            other: other.entity,
        })
}
