// Falling squares demo: a bouncy ground slab and a row of squares dropped onto it

use glam::{Vec2, Vec4};
use log::info;

use crate::engine::entity::EntityId;
use crate::engine::frame::FrameDriver;
use crate::engine::physics::presets;
use crate::engine::renderer::TextureHandle;
use crate::engine::scene::QuadDesc;

pub const SQUARE_COUNT: usize = 5;
pub const SQUARE_SIZE: f32 = 0.4;

const GROUND_POSITION: Vec2 = Vec2::new(0.0, -1.0);
const GROUND_SIZE: Vec2 = Vec2::new(10.0, 0.5);
const GROUND_COLOR: Vec4 = Vec4::new(0.35, 0.35, 0.4, 1.0);

/// Spawn the static ground
pub fn setup(driver: &mut FrameDriver) -> EntityId {
    let ground = presets::ground(
        GROUND_POSITION.x,
        GROUND_POSITION.y,
        GROUND_SIZE.x,
        GROUND_SIZE.y,
    );
    let id = driver.spawn_quad(
        QuadDesc::new(GROUND_POSITION, GROUND_SIZE, GROUND_COLOR).with_body(ground),
    );
    info!("Falling squares scene ready, ground {}", id);
    id
}

/// Spawn one row of squares above the ground
///
/// Every other square uses `texture` when one is given.
pub fn spawn_squares(driver: &mut FrameDriver, texture: Option<TextureHandle>) -> Vec<EntityId> {
    let ids: Vec<EntityId> = (0..SQUARE_COUNT)
        .map(|i| {
            let fi = i as f32;
            let position = Vec2::new(fi * 1.5 - 3.0, fi + 2.0);

            let mut body = presets::falling_square(
                position.x,
                position.y,
                SQUARE_SIZE,
                1.0 + fi * 0.5,
            );
            body.restitution = 0.6 + fi * 0.08;

            let mut desc =
                QuadDesc::new(position, Vec2::splat(SQUARE_SIZE), square_color(i)).with_body(body);
            if let Some(texture) = texture.filter(|_| i % 2 == 1) {
                desc = desc.with_texture(texture);
            }
            driver.spawn_quad(desc.with_z(0.1))
        })
        .collect();

    info!("Spawned {} falling squares", ids.len());
    ids
}

/// Hue sweep from orange to blue
fn square_color(index: usize) -> Vec4 {
    let t = index as f32 / (SQUARE_COUNT - 1) as f32;
    Vec4::new(1.0 - 0.7 * t, 0.5, 0.2 + 0.8 * t, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::FIXED_TIMESTEP;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_setup_creates_static_ground() {
        let mut driver = FrameDriver::default();
        let ground = setup(&mut driver);

        let body = driver.physics().body(ground).unwrap();
        assert!(body.is_static);
        assert_eq!(body.restitution, 0.8);
        assert_eq!(body.size, GROUND_SIZE);
    }

    #[test]
    fn test_spawned_square_parameters() {
        let mut driver = FrameDriver::default();
        let ids = spawn_squares(&mut driver, None);
        assert_eq!(ids.len(), SQUARE_COUNT);

        for (i, id) in ids.iter().enumerate() {
            let fi = i as f32;
            let body = driver.physics().body(*id).unwrap();
            assert_eq!(body.position, Vec2::new(fi * 1.5 - 3.0, fi + 2.0));
            assert_eq!(body.size, Vec2::splat(SQUARE_SIZE));
            assert_abs_diff_eq!(body.mass, 1.0 + fi * 0.5);
            assert_abs_diff_eq!(body.restitution, 0.6 + fi * 0.08);
        }
    }

    #[test]
    fn test_alternate_squares_are_textured() {
        let mut driver = FrameDriver::default();
        let checker = crate::engine::renderer::testing::RecordingDevice::texture(0);
        let ids = spawn_squares(&mut driver, Some(checker));

        let textured: Vec<bool> = ids
            .iter()
            .map(|id| driver.scene().object(*id).unwrap().texture.is_some())
            .collect();
        assert_eq!(textured, vec![false, true, false, true, false]);
    }

    #[test]
    fn test_squares_come_to_rest_on_ground() {
        let mut driver = FrameDriver::default();
        setup(&mut driver);
        let ids = spawn_squares(&mut driver, None);

        // Ten simulated seconds
        for _ in 0..600 {
            driver.update(FIXED_TIMESTEP);
        }

        let ground_top = GROUND_POSITION.y + GROUND_SIZE.y * 0.5;
        for id in ids {
            let body = driver.physics().body(id).unwrap();
            let bottom = body.position.y - SQUARE_SIZE * 0.5;
            assert!(bottom >= ground_top - 0.05, "square sank: {}", bottom);
            assert!(bottom < ground_top + 0.05, "square still airborne: {}", bottom);
            assert!(body.velocity.y.abs() < 0.5);
        }
    }
}
