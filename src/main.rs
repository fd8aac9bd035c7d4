use anyhow::Result;
use log::{debug, error, info, trace};
use std::sync::Arc;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::config::EngineConfig;
use engine::frame::FrameDriver;
use engine::game_loop::GameLoop;
use engine::renderer::{texture::checkerboard, Renderer};
use game::falling_squares;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = EngineConfig::default();
    info!("Starting {}...", config.title);

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), &config))?;
    let checker = renderer.create_texture(
        &checkerboard(64, 8, [255, 255, 255, 255], [90, 90, 110, 255]),
        "Checker",
    );

    let mut driver = FrameDriver::new(config.physics, config.show_debug_bounds);
    falling_squares::setup(&mut driver);

    let mut clock = GameLoop::new();
    let mut squares_spawned = false;

    info!("Controls: W = drop squares, P = pause, B = toggle bounds");

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(physical_size),
                ..
            } => {
                renderer.resize(physical_size);
            }
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state: ElementState::Pressed,
                                repeat: false,
                                ..
                            },
                        ..
                    },
                ..
            } => match code {
                KeyCode::KeyW if !squares_spawned => {
                    falling_squares::spawn_squares(&mut driver, Some(checker));
                    squares_spawned = true;
                }
                KeyCode::KeyP => clock.toggle_pause(),
                KeyCode::KeyB => driver.debug_draw_mut().toggle(),
                KeyCode::Escape => elwt.exit(),
                _ => {}
            },
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                let dt = clock.begin_frame();
                driver.update(dt);

                if clock.frame_count() % 600 == 0 {
                    debug!(
                        "{:.1} FPS, {} bodies, {} physics steps",
                        clock.fps(),
                        driver.physics().body_count(),
                        driver.physics().step_count()
                    );
                }

                match renderer.render(|session| driver.draw(session)) {
                    Ok(stats) => trace!(
                        "Frame {}: {} quads in {} draw calls",
                        clock.frame_count(),
                        stats.quads,
                        stats.draw_calls
                    ),
                    Err(e) => {
                        error!("Render error: {}", e);
                        elwt.exit();
                    }
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
