use rayon::prelude::*;

use crate::bounds::Bounds;
use crate::particle::{lerp, Particle};

// Everything one update pass needs, shared read-only by every batch
#[derive(Debug, Copy, Clone)]
pub struct StepParameters {
    pub delta_time: f32,
    pub bounds: Bounds,
    pub speed_min: f32,
    pub speed_max: f32,
}

impl StepParameters {
    pub fn instant_speed(&self, speed_factor: f32) -> f32 {
        lerp(self.speed_min, self.speed_max, speed_factor) * self.delta_time
    }

    // The furthest any particle can travel per axis in one step
    pub fn max_step(&self) -> f32 {
        self.instant_speed(1.0)
    }
}

// step_particle advances one particle. The bounds check happens after the move, so a particle
// can finish the step past an edge and only turns around on the next one.
pub fn step_particle(particle: &mut Particle, parameters: &StepParameters) {
    let speed = parameters.instant_speed(particle.speed_factor);
    let bounds = &parameters.bounds;

    if particle.moving_left {
        particle.position.x -= speed;
        if particle.position.x <= bounds.x_min {
            particle.moving_left = false;
        }
    } else {
        particle.position.x += speed;
        if particle.position.x >= bounds.x_max {
            particle.moving_left = true;
        }
    }

    if particle.moving_up {
        particle.position.y += speed;
        if particle.position.y >= bounds.y_max {
            particle.moving_up = false;
        }
    } else {
        particle.position.y -= speed;
        if particle.position.y <= bounds.y_min {
            particle.moving_up = true;
        }
    }
}

// Parallel update over disjoint batches of `batch_size` particles on the current rayon pool
pub fn update_particles(particles: &mut [Particle], parameters: &StepParameters, batch_size: usize) {
    particles
        .par_chunks_mut(batch_size.max(1))
        .for_each(|batch| {
            for particle in batch {
                step_particle(particle, parameters)
            }
        });
}

pub fn update_particles_sequential(particles: &mut [Particle], parameters: &StepParameters) {
    for particle in particles {
        step_particle(particle, parameters)
    }
}
