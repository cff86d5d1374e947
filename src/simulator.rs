use std::sync::Arc;

use log::{debug, info, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};
use sprite_swarm_renderer::{OrthographicCamera, SpriteBatcher, SpriteMesh, SpriteSheet};
use winit::dpi::PhysicalSize;

use crate::bounds::{BoundsProvider, BoundsSource};
use crate::config::{ExecutionMode, SimulationConfig};
use crate::error::{Result, SimulationError};
use crate::generator::ParticleGenerator;
use crate::jobs::JobHandle;
use crate::palette::WeightedPalette;
use crate::particle::{Particle, SPRITE_VARIANTS};
use crate::pipeline::{run_sequential_frame, schedule_update, BatchOutput, BatchStage};
use crate::store::ParticleStore;
use crate::updater::StepParameters;

enum Executor {
    Parallel {
        pool: Arc<ThreadPool>,
        stage: BatchStage,
    },
    Sequential {
        batcher: SpriteBatcher,
    },
}

// Where the single store buffer is right now
enum StoreSlot {
    Idle(ParticleStore),
    InFlight(JobHandle<BatchOutput>),
    Disposed,
}

// SpriteSimulator is the host facing side of the swarm. The host calls update once per frame,
// late_update once the rest of its frame work is done, and shutdown when it exits.
pub struct SpriteSimulator {
    config: SimulationConfig,
    bounds: BoundsSource,
    executor: Executor,
    store: StoreSlot,
    mesh: Option<SpriteMesh>,
    frame: u64,
}

impl SpriteSimulator {
    pub fn initialize(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let bounds = bounds_source(&config);
        let generation_bounds = match bounds.camera() {
            Some(camera) => camera.bounds(),
            None => config.generation_bounds,
        };

        let mut generator = ParticleGenerator::new(
            WeightedPalette::from_rgba8(&config.palette_rgba8())?,
            generation_bounds,
            config.sprite_count,
            (config.scale_min, config.scale_max),
            config.seed,
        );
        let store = ParticleStore::initialize(config.sprite_count, |i| generator.generate(i))?;

        Self::with_store(config, store)
    }

    // Starts a simulation from an existing store instead of generating one
    pub fn with_store(config: SimulationConfig, store: ParticleStore) -> Result<Self> {
        config.validate()?;

        let batcher = SpriteBatcher::new(
            SpriteSheet::strip(SPRITE_VARIANTS),
            config.vertex_batch_size,
            config.index_batch_size,
        );

        let executor = match config.execution {
            ExecutionMode::Parallel => {
                let mut builder =
                    ThreadPoolBuilder::new().thread_name(|i| format!("sprite-swarm-worker-{}", i));
                if let Some(threads) = config.worker_threads {
                    builder = builder.num_threads(threads);
                }
                let pool = Arc::new(builder.build()?);

                Executor::Parallel {
                    stage: BatchStage::start(pool.clone(), batcher)?,
                    pool,
                }
            }
            ExecutionMode::Sequential => Executor::Sequential { batcher },
        };

        info!(
            "Simulation initialized: {} sprites, {:?} execution",
            store.len(),
            config.execution
        );

        Ok(SpriteSimulator {
            bounds: bounds_source(&config),
            mesh: Some(SpriteMesh::with_capacity(store.len())),
            store: StoreSlot::Idle(store),
            executor,
            config,
            frame: 0,
        })
    }

    // update schedules this frame's update, sort and batch and returns without waiting for any
    // of them. If the previous frame was never finalized it is reclaimed first.
    pub fn update(&mut self, delta_time: f32) -> Result<()> {
        if matches!(self.store, StoreSlot::InFlight(_)) {
            warn!("Frame {} was not finalized before the next update", self.frame);
        }
        let store = self.reclaim()?;

        let parameters = StepParameters {
            delta_time,
            bounds: self.bounds.bounds(),
            speed_min: self.config.speed_min,
            speed_max: self.config.speed_max,
        };
        let mesh = self.mesh.take().unwrap_or_default();

        let batch = match &self.executor {
            Executor::Parallel { pool, stage } => {
                let sorted = schedule_update(pool, store, parameters, self.config.update_batch_size);
                stage.batch_start(sorted, mesh)?
            }
            Executor::Sequential { batcher } => {
                JobHandle::completed(Ok(run_sequential_frame(store, parameters, batcher, mesh)))
            }
        };

        self.store = StoreSlot::InFlight(batch);
        self.frame += 1;
        debug!("Frame {} scheduled", self.frame);

        Ok(())
    }

    // late_update waits for the frame's batch and returns its mesh for drawing. Returns None
    // when there is no frame in flight.
    pub fn late_update(&mut self) -> Result<Option<&SpriteMesh>> {
        if !matches!(self.store, StoreSlot::InFlight(_)) {
            return match self.store {
                StoreSlot::Disposed => Err(SimulationError::ShutDown),
                _ => Ok(None),
            };
        }

        let store = self.reclaim()?;
        self.store = StoreSlot::Idle(store);

        Ok(self.mesh.as_ref())
    }

    // Finalizes anything in flight and releases the store. Safe to call more than once.
    pub fn shutdown(&mut self) -> Result<()> {
        let result = match std::mem::replace(&mut self.store, StoreSlot::Disposed) {
            StoreSlot::Idle(store) => {
                store.dispose();
                Ok(())
            }
            StoreSlot::InFlight(batch) => batch.wait().map(|output| output.store.dispose()),
            StoreSlot::Disposed => return Ok(()),
        };

        if let Executor::Parallel { stage, .. } = &mut self.executor {
            stage.shutdown();
        }
        info!("Simulation shut down after {} frames", self.frame);

        result
    }

    // Waits for the store to come back from the batcher, keeping the mesh for the next frame
    fn reclaim(&mut self) -> Result<ParticleStore> {
        match std::mem::replace(&mut self.store, StoreSlot::Disposed) {
            StoreSlot::Idle(store) => Ok(store),
            StoreSlot::InFlight(batch) => {
                let BatchOutput { store, mesh } = batch.wait()?;
                self.mesh = Some(mesh);
                Ok(store)
            }
            StoreSlot::Disposed => Err(SimulationError::ShutDown),
        }
    }

    // Only readable between late_update and the next update
    pub fn particles(&self) -> Option<&[Particle]> {
        match &self.store {
            StoreSlot::Idle(store) => Some(store.as_slice()),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.store, StoreSlot::InFlight(_))
    }

    pub fn resized(&mut self, new_size: PhysicalSize<u32>) {
        self.bounds.resized(new_size)
    }

    pub fn camera(&self) -> Option<&OrthographicCamera> {
        self.bounds.camera()
    }

    pub fn bounds(&self) -> &BoundsSource {
        &self.bounds
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Drop for SpriteSimulator {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Simulation shutdown failed: {}", e);
        }
    }
}

fn bounds_source(config: &SimulationConfig) -> BoundsSource {
    match config.camera {
        Some(camera) => {
            BoundsSource::Camera(OrthographicCamera::new(camera.half_size, camera.aspect_ratio))
        }
        None => BoundsSource::Static(config.bounds),
    }
}
