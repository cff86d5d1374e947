use rayon::prelude::*;

use crate::particle::{depth_order, Particle};

// Back to front by y. Must only run once every particle has been updated for the frame.
pub fn sort_by_depth(particles: &mut [Particle]) {
    particles.par_sort_unstable_by(depth_order);
}

pub fn sort_by_depth_sequential(particles: &mut [Particle]) {
    particles.sort_unstable_by(depth_order);
}

pub fn is_depth_sorted(particles: &[Particle]) -> bool {
    particles
        .windows(2)
        .all(|pair| pair[0].position.y >= pair[1].position.y)
}
