// Per-frame update and draw

use glam::Vec2;
use log::trace;

use crate::engine::entity::EntityId;
use crate::engine::game_loop::clamp_frame_time;
use crate::engine::physics::{CollisionEvent, PhysicsDebugDraw, PhysicsSettings, PhysicsWorld};
use crate::engine::renderer::{BatchSession, CameraMatrices, GraphicsDevice};
use crate::engine::scene::{QuadDesc, Scene};

/// Owns the simulation state and turns it into batch draws once per frame
pub struct FrameDriver {
    physics: PhysicsWorld,
    scene: Scene,
    debug_draw: PhysicsDebugDraw,
}

impl FrameDriver {
    pub fn new(settings: PhysicsSettings, show_debug_bounds: bool) -> Self {
        Self {
            physics: PhysicsWorld::with_settings(settings),
            scene: Scene::new(),
            debug_draw: PhysicsDebugDraw::new(show_debug_bounds),
        }
    }

    /// Advance physics by a frame delta and move scene objects with their bodies
    ///
    /// `dt` is clamped to `MAX_FRAME_TIME`. Returns the number of fixed steps
    /// taken.
    pub fn update(&mut self, dt: f32) -> u32 {
        let steps = self.physics.advance(clamp_frame_time(dt));
        self.scene.sync_from_physics(&self.physics);

        for event in self.physics.events() {
            match event {
                CollisionEvent::Contact { a, b, .. } => trace!("Contact {} <-> {}", a, b),
                CollisionEvent::Trigger { trigger, other } => {
                    trace!("Trigger {} entered by {}", trigger, other)
                }
            }
        }

        steps
    }

    /// Queue every visible object, then the debug overlay
    pub fn draw<D, C>(&self, session: &mut BatchSession<'_, D, C>)
    where
        D: GraphicsDevice,
        C: CameraMatrices + ?Sized,
    {
        for object in self.scene.objects().iter().filter(|o| o.visible) {
            session.draw_quad(object.model_matrix(), Vec2::ONE, object.color, object.texture);
        }

        self.debug_draw.draw(&self.physics, session);
    }

    pub fn spawn_quad(&mut self, desc: QuadDesc) -> EntityId {
        self.scene.spawn_quad(&mut self.physics, desc)
    }

    pub fn despawn(&mut self, entity: EntityId) -> bool {
        self.scene.despawn(&mut self.physics, entity)
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn debug_draw_mut(&mut self) -> &mut PhysicsDebugDraw {
        &mut self.debug_draw
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(PhysicsSettings::default(), false)
    }
}
