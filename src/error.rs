use std::collections::TryReserveError;

use rand::distributions::WeightedError;
use rayon::ThreadPoolBuildError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("failed to allocate a particle store for {count} particles")]
    StoreAllocation {
        count: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("invalid color palette: {0}")]
    Palette(#[from] WeightedError),

    #[error("failed to build the worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),

    #[error("failed to spawn the batch worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("a pipeline stage was dropped before it completed")]
    StageDisconnected,

    #[error("the simulation has been shut down")]
    ShutDown,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
