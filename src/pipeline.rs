// Hand-off between the simulation and the sprite batcher.
//
// A frame moves through three owners:
//
// 1. the update job, which steps and then depth sorts the store on the worker pool,
// 2. the batch worker, which waits on the update job's `JobHandle` and streams the sorted
//    particles into a `SpriteMesh`,
// 3. the simulator again, once it waits on the batch handle.
//
// The store is moved, never shared, so the next update cannot start on it while the batcher is
// still reading.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, trace, warn};
use rayon::ThreadPool;
use sprite_swarm_renderer::{SpriteBatcher, SpriteMesh};

use crate::error::{Result, SimulationError};
use crate::jobs::{self, JobCompleter, JobHandle};
use crate::sorter::{sort_by_depth, sort_by_depth_sequential};
use crate::store::ParticleStore;
use crate::updater::{update_particles, update_particles_sequential, StepParameters};

// What the batch stage gives back: the store, untouched since the sort, and the filled mesh
#[derive(Debug)]
pub struct BatchOutput {
    pub store: ParticleStore,
    pub mesh: SpriteMesh,
}

// Chains update and sort into one job on the pool. The sort only starts after every update
// batch has joined.
pub fn schedule_update(
    pool: &ThreadPool,
    mut store: ParticleStore,
    parameters: StepParameters,
    batch_size: usize,
) -> JobHandle<ParticleStore> {
    jobs::spawn(pool, move || {
        let start = Instant::now();
        update_particles(store.as_mut_slice(), &parameters, batch_size);
        let updated = start.elapsed();
        sort_by_depth(store.as_mut_slice());
        trace!(
            "update {:?}, sort {:?} for {} particles",
            updated,
            start.elapsed() - updated,
            store.len()
        );

        store
    })
}

// The single threaded frame, same result as schedule_update followed by a batch
pub fn run_sequential_frame(
    mut store: ParticleStore,
    parameters: StepParameters,
    batcher: &SpriteBatcher,
    mut mesh: SpriteMesh,
) -> BatchOutput {
    update_particles_sequential(store.as_mut_slice(), &parameters);
    sort_by_depth_sequential(store.as_mut_slice());
    batcher.build_sequential(store.as_slice(), &mut mesh);

    BatchOutput { store, mesh }
}

struct BatchRequest {
    source: JobHandle<ParticleStore>,
    mesh: SpriteMesh,
    completer: JobCompleter<BatchOutput>,
}

// BatchStage owns a long lived worker thread that consumes sorted stores. Geometry chunks are
// built inside the worker pool.
pub struct BatchStage {
    requests: Option<Sender<BatchRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl BatchStage {
    pub fn start(pool: Arc<ThreadPool>, batcher: SpriteBatcher) -> Result<Self> {
        let (requests, receiver) = unbounded();

        let worker = thread::Builder::new()
            .name("sprite-batcher".to_string())
            .spawn(move || batch_worker(pool, batcher, receiver))?;

        debug!("Batch stage started");

        Ok(BatchStage {
            requests: Some(requests),
            worker: Some(worker),
        })
    }

    // batch_start queues a batch and returns at once. The worker only blocks on `source` when it
    // picks the request up.
    pub fn batch_start(
        &self,
        source: JobHandle<ParticleStore>,
        mesh: SpriteMesh,
    ) -> Result<JobHandle<BatchOutput>> {
        let requests = self.requests.as_ref().ok_or(SimulationError::ShutDown)?;
        let (completer, handle) = JobHandle::pending();

        requests
            .send(BatchRequest {
                source,
                mesh,
                completer,
            })
            .map_err(|_| SimulationError::StageDisconnected)?;

        Ok(handle)
    }

    // Lets the worker drain what is queued, then joins it
    pub fn shutdown(&mut self) {
        self.requests.take();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Batch worker panicked");
            }
            debug!("Batch stage stopped");
        }
    }
}

impl Drop for BatchStage {
    fn drop(&mut self) {
        self.shutdown()
    }
}

fn batch_worker(pool: Arc<ThreadPool>, batcher: SpriteBatcher, requests: Receiver<BatchRequest>) {
    for request in requests.iter() {
        let BatchRequest {
            source,
            mut mesh,
            completer,
        } = request;

        let output = source.wait().map(|store| {
            let start = Instant::now();
            pool.install(|| batcher.build(store.as_slice(), &mut mesh));
            trace!("batched {} sprites in {:?}", store.len(), start.elapsed());

            BatchOutput { store, mesh }
        });

        completer.complete(output);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nalgebra::point;
    use rayon::ThreadPoolBuilder;
    use sprite_swarm_renderer::{SpriteBatcher, SpriteMesh, SpriteSheet, VERTICES_PER_SPRITE};

    use crate::bounds::Bounds;
    use crate::error::SimulationError;
    use crate::jobs::JobHandle;
    use crate::particle::tests::particle_at;
    use crate::pipeline::{run_sequential_frame, schedule_update, BatchStage};
    use crate::sorter::is_depth_sorted;
    use crate::store::ParticleStore;
    use crate::updater::StepParameters;

    fn store(count: usize) -> ParticleStore {
        ParticleStore::initialize(count, |i| {
            let t = i as f32 / count as f32;
            let mut p = particle_at(point![t - 0.5, (t * 7.0).sin()], i % 2 == 0, i % 3 == 0);
            p.speed_factor = t;
            p
        })
        .unwrap()
    }

    fn parameters() -> StepParameters {
        StepParameters {
            delta_time: 1.0 / 60.0,
            bounds: Bounds::centered(1.0, 1.0),
            speed_min: 0.05,
            speed_max: 1.0,
        }
    }

    fn batcher() -> SpriteBatcher {
        SpriteBatcher::new(SpriteSheet::strip(3), 16, 16)
    }

    #[test]
    fn scheduled_update_sorts_after_updating() {
        let pool = ThreadPoolBuilder::new().num_threads(3).build().unwrap();

        let sorted = schedule_update(&pool, store(500), parameters(), 8)
            .wait()
            .unwrap();

        assert_eq!(sorted.len(), 500);
        assert!(is_depth_sorted(sorted.as_slice()));
    }

    #[test]
    fn batch_waits_for_source_then_returns_store() {
        let pool = Arc::new(ThreadPoolBuilder::new().num_threads(2).build().unwrap());
        let stage = BatchStage::start(pool, batcher()).unwrap();

        // The source is completed only after the batch has been queued
        let (completer, source) = JobHandle::pending();
        let batch = stage.batch_start(source, SpriteMesh::new()).unwrap();
        assert!(!batch.is_complete());

        completer.complete(Ok(store(40)));
        let output = batch.wait().unwrap();

        assert_eq!(output.store.len(), 40);
        assert_eq!(output.mesh.sprite_count(), 40);
        assert_eq!(output.mesh.vertices.len(), 40 * VERTICES_PER_SPRITE);
    }

    #[test]
    fn parallel_frame_matches_sequential_frame() {
        let pool = Arc::new(ThreadPoolBuilder::new().num_threads(4).build().unwrap());
        let stage = BatchStage::start(pool.clone(), batcher()).unwrap();

        let sorted = schedule_update(&pool, store(300), parameters(), 32);
        let parallel = stage.batch_start(sorted, SpriteMesh::new()).unwrap().wait().unwrap();

        let sequential = run_sequential_frame(store(300), parameters(), &batcher(), SpriteMesh::new());

        // Unstable sorts may order equal heights differently, compare the geometry as a set of
        // heights instead of position by position
        assert!(is_depth_sorted(parallel.store.as_slice()));
        assert!(is_depth_sorted(sequential.store.as_slice()));
        let heights = |s: &ParticleStore| s.iter().map(|p| p.position.y).collect::<Vec<_>>();
        assert_eq!(heights(&parallel.store), heights(&sequential.store));
        assert_eq!(parallel.mesh.indices, sequential.mesh.indices);
    }

    #[test]
    fn failed_source_is_forwarded() {
        let pool = Arc::new(ThreadPoolBuilder::new().num_threads(1).build().unwrap());
        let stage = BatchStage::start(pool, batcher()).unwrap();

        let (completer, source) = JobHandle::<ParticleStore>::pending();
        let batch = stage.batch_start(source, SpriteMesh::new()).unwrap();
        drop(completer);

        assert!(matches!(batch.wait(), Err(SimulationError::StageDisconnected)));
    }

    #[test]
    fn stopped_stage_rejects_batches() {
        let pool = Arc::new(ThreadPoolBuilder::new().num_threads(1).build().unwrap());
        let mut stage = BatchStage::start(pool, batcher()).unwrap();
        stage.shutdown();

        let result = stage.batch_start(JobHandle::completed(Ok(store(1))), SpriteMesh::new());

        assert!(matches!(result, Err(SimulationError::ShutDown)));
    }
}
