use glam::Vec2;

use super::body::RigidBody2D;
use crate::engine::entity::EntityId;

/// Tangential speeds below this (squared) produce no friction
const FRICTION_EPSILON_SQ: f32 = 1e-4;

/// Separation data for one overlapping pair
///
/// `normal` points from the second body toward the first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: Vec2,
    pub penetration: f32,
}

/// Collision event for game logic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    /// Two solid bodies overlapped and were pushed apart
    Contact {
        a: EntityId,
        b: EntityId,
        normal: Vec2,
        penetration: f32,
    },

    /// A trigger body overlaps another body (no physical response)
    Trigger { trigger: EntityId, other: EntityId },
}

/// Whether a pair takes part in solid collision at all
pub fn is_collidable_pair(a: &RigidBody2D, b: &RigidBody2D) -> bool {
    if !a.enabled || !b.enabled {
        return false;
    }
    if a.is_trigger || b.is_trigger {
        return false;
    }
    !(a.is_static && b.is_static)
}

/// Axis of least penetration between two overlapping bodies
///
/// Ties go to the Y axis.
pub fn compute_contact(a: &RigidBody2D, b: &RigidBody2D) -> Option<Contact> {
    let bounds_a = a.bounds();
    let bounds_b = b.bounds();
    if !bounds_a.overlaps(&bounds_b) {
        return None;
    }

    let overlap = bounds_a.overlap_depth(&bounds_b);
    let contact = if overlap.x < overlap.y {
        Contact {
            normal: if a.position.x < b.position.x {
                Vec2::NEG_X
            } else {
                Vec2::X
            },
            penetration: overlap.x,
        }
    } else {
        Contact {
            normal: if a.position.y < b.position.y {
                Vec2::NEG_Y
            } else {
                Vec2::Y
            },
            penetration: overlap.y,
        }
    };

    Some(contact)
}

/// Push the pair apart along the contact normal
///
/// The lighter body moves further; static bodies never move.
fn correct_positions(a: &mut RigidBody2D, b: &mut RigidBody2D, contact: &Contact) {
    let correction = contact.normal * contact.penetration;

    match (a.is_static, b.is_static) {
        (false, false) => {
            let total_mass = a.mass + b.mass;
            let (push_a, push_b) = if total_mass > 0.0 {
                (b.mass / total_mass, a.mass / total_mass)
            } else {
                (0.5, 0.5)
            };
            a.position += correction * push_a;
            b.position -= correction * push_b;
        }
        (false, true) => a.position += correction,
        (true, false) => b.position -= correction,
        (true, true) => {}
    }
}

/// Resolve one overlapping pair: positional correction, then a normal
/// impulse with restitution, then Coulomb friction clamped by the normal
/// impulse.
///
/// Returns the contact that was resolved, or `None` if the pair does not
/// overlap.
pub fn resolve_collision(a: &mut RigidBody2D, b: &mut RigidBody2D) -> Option<Contact> {
    let contact = compute_contact(a, b)?;
    correct_positions(a, b, &contact);

    let normal = contact.normal;
    let relative_velocity = a.velocity - b.velocity;
    let velocity_along_normal = relative_velocity.dot(normal);

    // Already separating
    if velocity_along_normal > 0.0 {
        return Some(contact);
    }

    let inv_mass_a = a.inverse_mass();
    let inv_mass_b = b.inverse_mass();
    let inv_mass_sum = inv_mass_a + inv_mass_b;
    if inv_mass_sum <= 0.0 {
        return Some(contact);
    }

    let e = a.restitution.min(b.restitution);
    let j = -(1.0 + e) * velocity_along_normal / inv_mass_sum;

    let impulse = normal * j;
    if !a.is_static {
        a.velocity += impulse * inv_mass_a;
    }
    if !b.is_static {
        b.velocity -= impulse * inv_mass_b;
    }

    let tangent = relative_velocity - normal * velocity_along_normal;
    if tangent.length_squared() > FRICTION_EPSILON_SQ {
        let tangent = tangent.normalize();
        let mu = (a.friction + b.friction) * 0.5;
        let friction_impulse = (-relative_velocity.dot(tangent)).clamp(-j * mu, j * mu);

        let friction = tangent * friction_impulse;
        if !a.is_static {
            a.velocity += friction;
        }
        if !b.is_static {
            b.velocity -= friction;
        }
    }

    Some(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::BodyBuilder;
    use approx::assert_abs_diff_eq;

    fn square(x: f32, y: f32, mass: f32) -> RigidBody2D {
        BodyBuilder::dynamic(Vec2::new(x, y), mass)
            .size(1.0, 1.0)
            .gravity(false)
            .linear_damping(0.0)
            .build()
    }

    #[test]
    fn test_no_contact_when_touching() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        assert!(compute_contact(&a, &b).is_none());
    }

    #[test]
    fn test_contact_picks_least_penetration_axis() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.8, 0.1, 1.0);

        let contact = compute_contact(&a, &b).unwrap();
        assert_eq!(contact.normal, Vec2::NEG_X);
        assert_abs_diff_eq!(contact.penetration, 0.2, epsilon = 1e-6);

        let contact = compute_contact(&b, &a).unwrap();
        assert_eq!(contact.normal, Vec2::X);
    }

    #[test]
    fn test_contact_tie_resolves_to_y() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);

        let contact = compute_contact(&a, &b).unwrap();
        assert_eq!(contact.normal, Vec2::NEG_Y);
        assert_abs_diff_eq!(contact.penetration, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_pair_filtering() {
        let a = square(0.0, 0.0, 1.0);
        let mut b = square(0.5, 0.0, 1.0);
        assert!(is_collidable_pair(&a, &b));

        b.is_trigger = true;
        assert!(!is_collidable_pair(&a, &b));

        b.is_trigger = false;
        b.enabled = false;
        assert!(!is_collidable_pair(&a, &b));

        let fixed_a = BodyBuilder::fixed(Vec2::ZERO).build();
        let fixed_b = BodyBuilder::fixed(Vec2::new(0.5, 0.0)).build();
        assert!(!is_collidable_pair(&fixed_a, &fixed_b));
    }

    #[test]
    fn test_positional_correction_favours_lighter_body() {
        let mut heavy = square(0.0, 0.0, 3.0);
        let mut light = square(0.6, 0.0, 1.0);

        resolve_collision(&mut heavy, &mut light).unwrap();

        // Penetration 0.4 split 1:3
        assert_abs_diff_eq!(heavy.position.x, -0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(light.position.x, 0.9, epsilon = 1e-6);
    }

    #[test]
    fn test_static_body_takes_no_correction() {
        let mut ground = BodyBuilder::fixed(Vec2::ZERO).size(4.0, 1.0).build();
        let mut box_body = square(0.0, 0.8, 1.0);
        box_body.velocity = Vec2::new(0.0, -2.0);

        resolve_collision(&mut ground, &mut box_body).unwrap();

        assert_eq!(ground.position, Vec2::ZERO);
        assert_eq!(ground.velocity, Vec2::ZERO);
        assert_abs_diff_eq!(box_body.position.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_separating_pair_keeps_velocities() {
        let mut a = square(0.0, 0.0, 1.0);
        let mut b = square(0.5, 0.0, 1.0);
        a.velocity = Vec2::new(-1.0, 0.3);
        b.velocity = Vec2::new(2.0, -0.3);

        resolve_collision(&mut a, &mut b).unwrap();

        assert_eq!(a.velocity, Vec2::new(-1.0, 0.3));
        assert_eq!(b.velocity, Vec2::new(2.0, -0.3));
    }

    #[test]
    fn test_head_on_equal_mass_elastic_swap() {
        let mut a = square(0.0, 0.0, 1.0);
        let mut b = square(0.9, 0.0, 1.0);
        a.restitution = 1.0;
        b.restitution = 1.0;
        a.velocity = Vec2::new(2.0, 0.0);
        b.velocity = Vec2::new(-2.0, 0.0);

        resolve_collision(&mut a, &mut b).unwrap();

        assert_abs_diff_eq!(a.velocity.x, -2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.velocity.x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_restitution_uses_minimum() {
        let mut ground = BodyBuilder::fixed(Vec2::ZERO)
            .size(4.0, 1.0)
            .restitution(0.8)
            .build();
        let mut ball = square(0.0, 0.9, 1.0);
        ball.restitution = 0.5;
        ball.velocity = Vec2::new(0.0, -4.0);

        resolve_collision(&mut ground, &mut ball).unwrap();

        assert_abs_diff_eq!(ball.velocity.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_friction_is_clamped_by_normal_impulse() {
        let mut ground = BodyBuilder::fixed(Vec2::ZERO)
            .size(10.0, 1.0)
            .friction(0.5)
            .restitution(0.0)
            .build();
        let mut slider = square(0.0, 0.95, 1.0);
        slider.friction = 0.5;
        slider.restitution = 0.0;
        slider.velocity = Vec2::new(3.0, -1.0);

        resolve_collision(&mut ground, &mut slider).unwrap();

        // j = 1, mu = 0.5: tangential speed drops by at most 0.5
        assert_abs_diff_eq!(slider.velocity.y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(slider.velocity.x, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn test_friction_can_stop_slow_sliding() {
        let mut ground = BodyBuilder::fixed(Vec2::ZERO)
            .size(10.0, 1.0)
            .friction(1.0)
            .restitution(0.0)
            .build();
        let mut slider = square(0.0, 0.95, 1.0);
        slider.friction = 1.0;
        slider.restitution = 0.0;
        slider.velocity = Vec2::new(0.5, -2.0);

        resolve_collision(&mut ground, &mut slider).unwrap();

        assert_abs_diff_eq!(slider.velocity.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_friction_between_dynamic_bodies() {
        let mut top = square(0.0, 0.9, 1.0);
        let mut bottom = square(0.0, 0.0, 1.0);
        for body in [&mut top, &mut bottom] {
            body.friction = 0.5;
            body.restitution = 0.0;
        }
        top.velocity = Vec2::new(2.0, -1.0);

        let contact = resolve_collision(&mut top, &mut bottom).unwrap();
        assert_eq!(contact.normal, Vec2::Y);

        // j = 0.5 split over two unit masses, friction clamped to mu * j = 0.25
        assert_abs_diff_eq!(top.velocity.y, -0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(bottom.velocity.y, -0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(top.velocity.x, 2.0 - 0.25, epsilon = 1e-5);
        assert_abs_diff_eq!(bottom.velocity.x, 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_massless_dynamic_pair_does_not_divide_by_zero() {
        let mut a = square(0.0, 0.0, 0.0);
        let mut b = square(0.5, 0.0, 0.0);
        a.velocity = Vec2::new(1.0, 0.0);

        resolve_collision(&mut a, &mut b).unwrap();

        assert!(a.velocity.is_finite());
        assert!(a.position.is_finite());
        assert_eq!(a.velocity, Vec2::new(1.0, 0.0));
    }
}
