// Drawable scene objects and their link to the physics world

use glam::{Mat4, Vec2, Vec3, Vec4};
use log::debug;

use crate::core::math::model_matrix;
use crate::engine::entity::{EntityAllocator, EntityId};
use crate::engine::physics::{PhysicsWorld, RigidBody2D};
use crate::engine::renderer::TextureHandle;

/// Description of a quad to spawn
#[derive(Debug, Clone)]
pub struct QuadDesc {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Vec4,
    pub texture: Option<TextureHandle>,
    /// Depth used for layering
    pub z: f32,
    /// Body to register; its position and size are taken from the quad
    pub body: Option<RigidBody2D>,
}

impl QuadDesc {
    pub fn new(position: Vec2, size: Vec2, color: Vec4) -> Self {
        Self {
            position,
            size,
            color,
            texture: None,
            z: 0.0,
            body: None,
        }
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    pub fn with_body(mut self, body: RigidBody2D) -> Self {
        self.body = Some(body);
        self
    }
}

/// A quad in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub entity: EntityId,
    pub position: Vec3,
    /// Rotation around Z in radians
    pub rotation: f32,
    pub scale: Vec2,
    pub color: Vec4,
    pub texture: Option<TextureHandle>,
    pub visible: bool,
    /// Whether the position follows a physics body
    pub has_body: bool,
}

impl SceneObject {
    pub fn model_matrix(&self) -> Mat4 {
        model_matrix(self.position, self.rotation, self.scale)
    }
}

/// Flat list of scene objects in spawn order
#[derive(Default)]
pub struct Scene {
    allocator: EntityAllocator,
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quad and register its body (if any) with `physics`
    pub fn spawn_quad(&mut self, physics: &mut PhysicsWorld, desc: QuadDesc) -> EntityId {
        let entity = self.allocator.allocate();

        let has_body = match desc.body {
            Some(mut body) => {
                body.position = desc.position;
                body.size = desc.size;
                physics.add_body(entity, body)
            }
            None => false,
        };

        self.objects.push(SceneObject {
            entity,
            position: desc.position.extend(desc.z),
            rotation: 0.0,
            scale: desc.size,
            color: desc.color,
            texture: desc.texture,
            visible: true,
            has_body,
        });

        debug!("Spawned quad {} (body: {})", entity, has_body);
        entity
    }

    /// Remove an object and its body; unknown entities are ignored
    pub fn despawn(&mut self, physics: &mut PhysicsWorld, entity: EntityId) -> bool {
        physics.remove_body(entity);

        match self.objects.iter().position(|o| o.entity == entity) {
            Some(index) => {
                self.objects.remove(index);
                debug!("Despawned {}", entity);
                true
            }
            None => false,
        }
    }

    /// Copy body positions onto their scene objects
    pub fn sync_from_physics(&mut self, physics: &PhysicsWorld) {
        for object in self.objects.iter_mut().filter(|o| o.has_body) {
            if let Some(body) = physics.body(object.entity) {
                object.position.x = body.position.x;
                object.position.y = body.position.y;
            }
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, entity: EntityId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.entity == entity)
    }

    pub fn object_mut(&mut self, entity: EntityId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.entity == entity)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
