use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sprite_swarm_renderer::OrthographicCamera;
use thiserror::Error;

use crate::bounds::Bounds;
use crate::palette::DEFAULT_PALETTE;

// Accepted range for every batch size setting
pub const BATCH_SIZE_RANGE: std::ops::RangeInclusive<usize> = 1..=20_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    // Update, sort and batch on the worker pool
    Parallel,
    // Everything inline on the calling thread
    Sequential,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub half_size: f32,
    pub aspect_ratio: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub rgba: [u8; 4],
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub target_frame_rate: u32,
    // Refresh rate of the display, divided by the target to get the vsync interval
    pub refresh_rate: u32,
    pub use_fixed_delta: bool,
    pub fixed_delta: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            target_frame_rate: 60,
            refresh_rate: 60,
            use_fixed_delta: true,
            fixed_delta: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub sprite_count: usize,

    pub speed_min: f32,
    pub speed_max: f32,

    pub scale_min: f32,
    pub scale_max: f32,

    // particles per update job
    pub update_batch_size: usize,
    // sprites per vertex job in the batcher
    pub vertex_batch_size: usize,
    // sprites per index job in the batcher
    pub index_batch_size: usize,

    pub execution: ExecutionMode,
    // None lets rayon pick
    pub worker_threads: Option<usize>,
    // None seeds from entropy
    pub seed: Option<u64>,

    // Without a camera the static bounds are used
    pub camera: Option<CameraConfig>,
    pub bounds: Bounds,
    pub generation_bounds: Bounds,

    pub palette: Vec<PaletteEntry>,

    pub timing: TimingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            sprite_count: 1000,
            speed_min: 0.05,
            speed_max: 1.0,
            scale_min: 0.5,
            scale_max: 2.0,
            update_batch_size: 64,
            vertex_batch_size: 1000,
            index_batch_size: 1000,
            execution: ExecutionMode::Parallel,
            worker_threads: None,
            seed: None,
            camera: None,
            bounds: Bounds::centered(1.0, 1.0),
            generation_bounds: Bounds::centered(3.0, 3.0),
            palette: DEFAULT_PALETTE
                .iter()
                .map(|(rgba, weight)| PaletteEntry {
                    rgba: *rgba,
                    weight: *weight,
                })
                .collect(),
            timing: TimingConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (name, size) in [
            ("update_batch_size", self.update_batch_size),
            ("vertex_batch_size", self.vertex_batch_size),
            ("index_batch_size", self.index_batch_size),
        ] {
            if !BATCH_SIZE_RANGE.contains(&size) {
                return Err(ConfigError::Validation(format!(
                    "{} must be within {:?}, got {}",
                    name, BATCH_SIZE_RANGE, size
                )));
            }
        }

        if !(self.speed_min.is_finite() && self.speed_max.is_finite()) || self.speed_min > self.speed_max
        {
            return Err(ConfigError::Validation(format!(
                "speed range {}..{} is invalid",
                self.speed_min, self.speed_max
            )));
        }

        if !(self.scale_min.is_finite() && self.scale_max.is_finite()) {
            return Err(ConfigError::Validation("scale range must be finite".to_string()));
        }

        for (name, bounds) in [
            ("bounds", self.bounds),
            ("generation_bounds", self.generation_bounds),
        ] {
            if !bounds.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "{} must be finite with a finite span, got {:?}",
                    name, bounds
                )));
            }
        }

        if let Some(camera) = self.camera {
            let positive = |v: f32| v.is_finite() && v > 0.0;
            let camera_bounds = Bounds::from_camera(&OrthographicCamera::new(
                camera.half_size,
                camera.aspect_ratio,
            ));

            if !(positive(camera.half_size) && positive(camera.aspect_ratio))
                || !camera_bounds.is_finite()
            {
                return Err(ConfigError::Validation(format!(
                    "camera half_size {} and aspect_ratio {} must be positive with a finite view",
                    camera.half_size, camera.aspect_ratio
                )));
            }
        }

        if self.worker_threads == Some(0) {
            return Err(ConfigError::Validation(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        if self.palette.is_empty() {
            return Err(ConfigError::Validation("palette is empty".to_string()));
        }

        if self.timing.target_frame_rate == 0 {
            return Err(ConfigError::Validation(
                "target_frame_rate must be at least 1".to_string(),
            ));
        }

        if !(self.timing.fixed_delta.is_finite() && self.timing.fixed_delta >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "fixed_delta {} is invalid",
                self.timing.fixed_delta
            )));
        }

        Ok(())
    }

    pub fn palette_rgba8(&self) -> Vec<([u8; 4], f32)> {
        self.palette.iter().map(|e| (e.rgba, e.weight)).collect()
    }
}
