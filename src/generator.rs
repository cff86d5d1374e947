use nalgebra::point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::Bounds;
use crate::palette::WeightedPalette;
use crate::particle::{lerp, Particle, SPRITE_VARIANTS};

// Exponent applied to the uniform speed draw, skews the swarm toward slow movers
const SPEED_BIAS_EXPONENT: i32 = 7;

// Produces the initial state of particle `index` out of `count`
pub struct ParticleGenerator {
    rng: StdRng,
    palette: WeightedPalette,
    bounds: Bounds,
    count: usize,
    scale_min: f32,
    scale_max: f32,
}

impl ParticleGenerator {
    pub fn new(
        palette: WeightedPalette,
        bounds: Bounds,
        count: usize,
        scale_range: (f32, f32),
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        ParticleGenerator {
            rng,
            palette,
            bounds,
            count,
            scale_min: scale_range.0,
            scale_max: scale_range.1,
        }
    }

    pub fn generate(&mut self, index: usize) -> Particle {
        let x = random_in(&mut self.rng, self.bounds.x_min, self.bounds.x_max);
        let y = random_in(&mut self.rng, self.bounds.y_min, self.bounds.y_max);

        Particle {
            position: point![x, y],
            color: self.palette.sample(&mut self.rng),
            moving_left: self.rng.gen_bool(0.5),
            moving_up: self.rng.gen_bool(0.5),
            speed_factor: speed_factor(&mut self.rng),
            sprite_index: index % SPRITE_VARIANTS,
            rotation_angle: 0.0,
            scale: scale_at(index, self.count, self.scale_min, self.scale_max),
        }
    }
}

pub fn speed_factor<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>().powi(SPEED_BIAS_EXPONENT)
}

// Linear size gradient over the population, the last particle gets exactly scale_max
pub fn scale_at(index: usize, count: usize, scale_min: f32, scale_max: f32) -> f32 {
    lerp(scale_min, scale_max, (index as f32 + 1.0) / count as f32)
}

fn random_in<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min < max {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::bounds::Bounds;
    use crate::generator::{scale_at, speed_factor, ParticleGenerator};
    use crate::palette::{WeightedPalette, DEFAULT_PALETTE};
    use crate::particle::lerp;
    use crate::store::ParticleStore;

    fn generator(count: usize, bounds: Bounds, seed: u64) -> ParticleGenerator {
        ParticleGenerator::new(
            WeightedPalette::from_rgba8(&DEFAULT_PALETTE).unwrap(),
            bounds,
            count,
            (0.5, 2.0),
            Some(seed),
        )
    }

    #[test]
    fn speed_factor_skews_slow() {
        let mut rng = StdRng::seed_from_u64(42);

        let samples: Vec<f32> = (0..10_000).map(|_| speed_factor(&mut rng)).collect();
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;

        assert!(samples.iter().all(|f| (0.0..=1.0).contains(f)));
        // E[u^7] is 1/8
        assert!(mean < 0.2, "mean {}", mean);
    }

    #[test]
    fn scale_gradient_is_exact() {
        let count = 1000;
        let mut g = generator(count, Bounds::centered(3.0, 3.0), 3);

        for i in [0, 1, 499, 998, 999] {
            let expected = lerp(0.5, 2.0, (i as f32 + 1.0) / count as f32);
            assert_eq!(g.generate(i).scale, expected);
        }

        assert_eq!(scale_at(999, 1000, 0.5, 2.0), 2.0);
    }

    #[test]
    fn sprite_index_cycles() {
        let mut g = generator(6, Bounds::centered(3.0, 3.0), 3);

        let indices: Vec<usize> = (0..6).map(|i| g.generate(i).sprite_index).collect();

        assert_eq!(indices, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn positions_stay_in_generation_bounds() {
        let bounds = Bounds::centered(3.0, 2.0);
        let mut g = generator(500, bounds, 9);

        let store = ParticleStore::initialize(500, |i| g.generate(i)).unwrap();

        assert!(store
            .iter()
            .all(|p| bounds.contains(p.position.x, p.position.y)));
        assert!(store.iter().all(|p| p.rotation_angle == 0.0));
    }

    #[test]
    fn colors_come_from_palette() {
        let palette = WeightedPalette::from_rgba8(&DEFAULT_PALETTE).unwrap();
        let colors = palette.colors().to_vec();
        let mut g = generator(200, Bounds::centered(3.0, 3.0), 11);

        assert!((0..200).all(|i| colors.contains(&g.generate(i).color)));
    }

    #[test]
    fn degenerate_axis_uses_min() {
        let mut g = generator(10, Bounds::new(1.0, 1.0, -2.0, 2.0), 5);

        assert!((0..10).all(|i| g.generate(i).position.x == 1.0));
    }

    #[test]
    fn same_seed_same_swarm() {
        let mut a = generator(50, Bounds::centered(3.0, 3.0), 77);
        let mut b = generator(50, Bounds::centered(3.0, 3.0), 77);

        assert!((0..50).all(|i| a.generate(i) == b.generate(i)));
    }
}
