use std::ops::{Index, IndexMut};

use log::debug;

use crate::error::{Result, SimulationError};
use crate::particle::Particle;

// ParticleStore owns every particle for the lifetime of a simulation. The length is fixed at
// initialization, there is no way to insert or remove a particle afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    // initialize allocates exactly `count` particles and fills slot i with generator(i). If the
    // allocation fails nothing is generated.
    pub fn initialize(count: usize, mut generator: impl FnMut(usize) -> Particle) -> Result<Self> {
        let mut particles = Vec::new();
        particles
            .try_reserve_exact(count)
            .map_err(|source| SimulationError::StoreAllocation { count, source })?;

        particles.extend((0..count).map(&mut generator));

        debug!("Particle store initialized with {} particles", count);

        Ok(ParticleStore { particles })
    }

    // Takes the store by value so it can only be released once
    pub fn dispose(self) {
        debug!("Particle store disposed ({} particles)", self.particles.len());
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> + ExactSizeIterator + '_ {
        self.particles.iter()
    }
}

impl Index<usize> for ParticleStore {
    type Output = Particle;

    fn index(&self, index: usize) -> &Self::Output {
        &self.particles[index]
    }
}

impl IndexMut<usize> for ParticleStore {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.particles[index]
    }
}

impl AsRef<[Particle]> for ParticleStore {
    fn as_ref(&self) -> &[Particle] {
        self.as_slice()
    }
}
