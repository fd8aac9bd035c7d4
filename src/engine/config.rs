// Engine startup configuration

use crate::engine::physics::PhysicsSettings;

/// Window, renderer and physics settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Background color (RGBA, linear)
    pub clear_color: [f64; 4],
    /// Screen pixels per world unit at zoom 1.0
    pub pixels_per_unit: f32,
    /// Draw AABB outlines over the scene
    pub show_debug_bounds: bool,
    pub physics: PhysicsSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Civ Engine - Falling Squares".to_string(),
            width: 1280,
            height: 720,
            clear_color: [0.1, 0.1, 0.15, 1.0],
            pixels_per_unit: 64.0,
            show_debug_bounds: false,
            physics: PhysicsSettings::default(),
        }
    }
}
