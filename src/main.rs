use std::env;
use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use log::{error, info};
use sprite_swarm::time::{FrameClock, FramePacing};
use sprite_swarm::{SimulationConfig, SpriteSimulator};
use sprite_swarm_renderer::{OrthographicCamera, SpriteMesh, SpriteRenderer};
use winit::dpi::PhysicalSize;

const DEFAULT_FRAMES: u64 = 600;
const STATS_INTERVAL: u64 = 60;
const VIEWPORT_HEIGHT: u32 = 720;

// Stands in for a GPU backend, it only keeps statistics about what it was asked to draw
#[derive(Default)]
struct HeadlessRenderer {
    size: PhysicalSize<u32>,
    scale_factor: f64,
    draws: u64,
    sprites: u64,
}

impl SpriteRenderer for HeadlessRenderer {
    fn resized(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
    }

    fn rescaled(&mut self, new_scale_factor: f64) {
        self.scale_factor = new_scale_factor;
    }

    fn draw(&mut self, camera: &OrthographicCamera, mesh: &SpriteMesh) {
        self.draws += 1;
        self.sprites += mesh.visible_count() as u64;

        if self.draws % STATS_INTERVAL == 0 {
            let projection = camera.projection_matrix();
            info!(
                "draw {}: {} sprites, {} vertices, {} indices, {}x{} viewport, x scale {:.3}",
                self.draws,
                mesh.visible_count(),
                mesh.vertices.len(),
                mesh.indices.len(),
                self.size.width,
                self.size.height,
                projection[0][0]
            );
        }
    }
}

// A fixed height viewport, as wide as the configured camera asks for
fn headless_viewport(config: &SimulationConfig) -> PhysicalSize<u32> {
    let aspect_ratio = match config.camera {
        Some(camera) => camera.aspect_ratio,
        None => config.bounds.width() / config.bounds.height(),
    };
    let width = (VIEWPORT_HEIGHT as f32 * aspect_ratio).round();

    if width.is_finite() && width >= 1.0 && width <= u32::MAX as f32 {
        PhysicalSize::new(width as u32, VIEWPORT_HEIGHT)
    } else {
        PhysicalSize::new(VIEWPORT_HEIGHT, VIEWPORT_HEIGHT)
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);

    let config = match args.next() {
        Some(path) => SimulationConfig::from_toml_file(&path)?,
        None => SimulationConfig::default(),
    };
    let frames = match args.next() {
        Some(frames) => frames.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };

    let mut clock = FrameClock::from_config(&config.timing);
    let pacing = FramePacing::from_config(&config.timing);
    info!(
        "Target {} fps, vsync every {} refresh(es)",
        pacing.target_frame_rate, pacing.vsync_count
    );

    // Without a configured camera the draw still needs a projection, fall back to the bounds
    let fallback_camera = OrthographicCamera::new(
        config.bounds.height() / 2.0,
        config.bounds.width() / config.bounds.height(),
    );

    let mut renderer = HeadlessRenderer::default();
    renderer.resized(headless_viewport(&config));
    renderer.rescaled(1.0);

    // The viewport already matches the configured aspect, the camera is left as configured
    let mut simulator = SpriteSimulator::initialize(config)?;

    let start = Instant::now();
    for _ in 0..frames {
        let frame_start = Instant::now();

        simulator.update(clock.tick())?;

        let camera = simulator.camera().copied().unwrap_or(fallback_camera);
        if let Some(mesh) = simulator.late_update()? {
            renderer.draw(&camera, mesh);
        }

        thread::sleep(pacing.remaining(frame_start.elapsed()));
    }

    simulator.shutdown()?;
    info!(
        "{} frames, {} sprites drawn in {:.2?}",
        clock.frame_count(),
        renderer.sprites,
        start.elapsed()
    );

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use sprite_swarm::config::CameraConfig;
    use sprite_swarm::{BoundsProvider, SimulationConfig, SpriteSimulator};
    use winit::dpi::PhysicalSize;

    use crate::headless_viewport;

    #[test]
    fn viewport_follows_camera_aspect() {
        let mut config = SimulationConfig::default();
        config.camera = Some(CameraConfig {
            half_size: 5.0,
            aspect_ratio: 2.0,
        });

        assert_eq!(headless_viewport(&config), PhysicalSize::new(1440, 720));
    }

    #[test]
    fn viewport_follows_static_bounds() {
        let config = SimulationConfig::default();

        assert_eq!(headless_viewport(&config), PhysicalSize::new(720, 720));
    }

    #[test]
    fn resizing_to_viewport_keeps_camera_bounds() {
        let mut config = SimulationConfig::default();
        config.sprite_count = 4;
        config.camera = Some(CameraConfig {
            half_size: 5.0,
            aspect_ratio: 2.0,
        });
        let viewport = headless_viewport(&config);

        let mut simulator = SpriteSimulator::initialize(config).unwrap();
        let before = simulator.bounds().bounds();
        simulator.resized(viewport);

        assert_eq!(simulator.bounds().bounds(), before);
    }
}
