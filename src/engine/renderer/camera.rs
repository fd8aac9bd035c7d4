// Camera for 2D rendering in world units

use glam::{Mat4, Vec2, Vec3};

/// View and projection source for a batch flush
pub trait CameraMatrices {
    fn view_matrix(&self) -> Mat4;
    fn projection_matrix(&self) -> Mat4;
}

/// Orthographic 2D camera
///
/// World units map to `pixels_per_unit` screen pixels at zoom 1.0.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec2,
    /// Camera zoom level (1.0 = normal, 2.0 = zoomed in 2x)
    pub zoom: f32,
    /// Screen pixels per world unit at zoom 1.0
    pixels_per_unit: f32,
    /// Viewport width
    viewport_width: f32,
    /// Viewport height
    viewport_height: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Vec2,
        viewport_width: f32,
        viewport_height: f32,
        pixels_per_unit: f32,
    ) -> Self {
        Self {
            position,
            zoom: 1.0,
            pixels_per_unit: pixels_per_unit.max(f32::EPSILON),
            viewport_width,
            viewport_height,
        }
    }

    /// Set camera zoom
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(0.1); // Prevent zoom from being too small
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Half of the visible area in world units
    pub fn half_extents(&self) -> Vec2 {
        let scale = self.pixels_per_unit * self.zoom;
        Vec2::new(
            self.viewport_width / 2.0 / scale,
            self.viewport_height / 2.0 / scale,
        )
    }
}

impl CameraMatrices for Camera {
    fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0))
    }

    fn projection_matrix(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh(
            -half.x, half.x, -half.y, half.y, -100.0, // Near plane
            100.0,  // Far plane
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec4;

    #[test]
    fn test_half_extents() {
        let mut camera = Camera::new(Vec2::ZERO, 800.0, 600.0, 50.0);
        assert_eq!(camera.half_extents(), Vec2::new(8.0, 6.0));

        camera.set_zoom(2.0);
        assert_eq!(camera.half_extents(), Vec2::new(4.0, 3.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new(Vec2::ZERO, 800.0, 600.0, 50.0);
        camera.set_zoom(0.0);
        assert_eq!(camera.zoom, 0.1);
    }

    #[test]
    fn test_visible_corner_maps_to_clip_corner() {
        let camera = Camera::new(Vec2::new(2.0, 1.0), 800.0, 600.0, 50.0);
        let view_proj = camera.projection_matrix() * camera.view_matrix();

        // Top-right corner of the visible area
        let clip = view_proj * Vec4::new(10.0, 7.0, 0.0, 1.0);
        assert_abs_diff_eq!(clip.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(clip.y, 1.0, epsilon = 1e-5);

        let center = view_proj * Vec4::new(2.0, 1.0, 0.0, 1.0);
        assert_abs_diff_eq!(center.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(center.y, 0.0, epsilon = 1e-5);
    }
}
