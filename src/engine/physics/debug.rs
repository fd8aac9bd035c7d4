// Physics debug overlay: AABB outlines drawn through the quad batch

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::body::RigidBody2D;
use super::world::PhysicsWorld;
use crate::engine::renderer::{BatchSession, CameraMatrices, GraphicsDevice};

/// Outline depth, in front of regular scene quads
const OVERLAY_Z: f32 = 0.9;

/// Draws each body's bounding box as four thin quads
pub struct PhysicsDebugDraw {
    enabled: bool,
    /// Outline thickness in world units
    line_width: f32,
}

impl PhysicsDebugDraw {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            line_width: 0.03,
        }
    }

    /// Enable or disable debug rendering
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if debug rendering is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Queue outlines for every body in `world`
    pub fn draw<D, C>(&self, world: &PhysicsWorld, session: &mut BatchSession<'_, D, C>)
    where
        D: GraphicsDevice,
        C: CameraMatrices + ?Sized,
    {
        if !self.enabled {
            return;
        }

        for (_entity, body) in world.bodies() {
            let bounds = body.bounds();
            let color = outline_color(body);
            let center = bounds.center();
            let size = bounds.size();
            let half = size * 0.5;
            let w = self.line_width;

            let edges = [
                // Bottom, top
                (Vec2::new(center.x, center.y - half.y), Vec2::new(size.x + w, w)),
                (Vec2::new(center.x, center.y + half.y), Vec2::new(size.x + w, w)),
                // Left, right
                (Vec2::new(center.x - half.x, center.y), Vec2::new(w, size.y + w)),
                (Vec2::new(center.x + half.x, center.y), Vec2::new(w, size.y + w)),
            ];

            for (position, edge_size) in edges {
                let model = Mat4::from_translation(Vec3::new(position.x, position.y, OVERLAY_Z));
                session.draw_quad(model, edge_size, color, None);
            }
        }
    }
}

impl Default for PhysicsDebugDraw {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Gray for static, blue for triggers, green for dynamic, dim white when disabled
fn outline_color(body: &RigidBody2D) -> Vec4 {
    if !body.enabled {
        Vec4::new(1.0, 1.0, 1.0, 0.3)
    } else if body.is_trigger {
        Vec4::new(0.0, 0.5, 1.0, 0.8)
    } else if body.is_static {
        Vec4::new(0.5, 0.5, 0.5, 0.8)
    } else {
        Vec4::new(0.0, 1.0, 0.0, 0.8)
    }
}
