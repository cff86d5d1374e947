// A swarm of bouncing sprites, stepped in parallel, depth sorted every frame and handed to a
// sprite batcher without sharing the particle store between stages.

pub mod bounds;
pub mod config;
pub mod error;
pub mod generator;
pub mod jobs;
pub mod palette;
pub mod particle;
pub mod pipeline;
pub mod simulator;
pub mod sorter;
pub mod store;
pub mod time;
pub mod updater;

pub use bounds::{Bounds, BoundsProvider, BoundsSource};
pub use config::{ConfigError, ExecutionMode, SimulationConfig};
pub use error::{Result, SimulationError};
pub use particle::Particle;
pub use simulator::SpriteSimulator;
pub use store::ParticleStore;
