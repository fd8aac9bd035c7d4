// Engine modules: physics, renderer, scene, frame timing

pub mod config;
pub mod entity;
pub mod frame;
pub mod game_loop;
pub mod physics;
pub mod renderer;
pub mod scene;
