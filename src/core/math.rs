// Math utilities and helper functions

use glam::{Mat4, Quat, Vec2, Vec3};

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build a box centred on `center` with full extents `size`
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Penetration depth on each axis (positive when overlapping)
    pub fn overlap_depth(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            (self.max.x - other.min.x).min(other.max.x - self.min.x),
            (self.max.y - other.min.y).min(other.max.y - self.min.y),
        )
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Model matrix for a 2D object: scale, then rotate around Z, then translate
pub fn model_matrix(position: Vec3, rotation_z: f32, scale: Vec2) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(scale.x, scale.y, 1.0),
        Quat::from_rotation_z(rotation_z),
        position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_aabb_from_center_size() {
        let aabb = Aabb::from_center_size(Vec2::new(0.0, -1.0), Vec2::new(10.0, 0.5));
        assert_eq!(aabb.min, Vec2::new(-5.0, -1.25));
        assert_eq!(aabb.max, Vec2::new(5.0, -0.75));
        assert_eq!(aabb.center(), Vec2::new(0.0, -1.0));
        assert_eq!(aabb.size(), Vec2::new(10.0, 0.5));
    }

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = Aabb::from_center_size(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::from_center_size(Vec2::new(1.0, 0.0), Vec2::ONE);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Aabb::from_center_size(Vec2::new(0.9, 0.0), Vec2::ONE);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_overlap_depth() {
        let a = Aabb::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = Aabb::from_center_size(Vec2::new(1.5, 0.5), Vec2::new(2.0, 2.0));
        let depth = a.overlap_depth(&b);
        assert_abs_diff_eq!(depth.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(depth.y, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_model_matrix_translates_and_scales() {
        let m = model_matrix(Vec3::new(3.0, 4.0, 0.0), 0.0, Vec2::new(2.0, 0.5));
        let p = m.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 4.5, epsilon = 1e-6);
    }
}
