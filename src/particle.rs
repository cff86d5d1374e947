use std::cmp::Ordering;

use nalgebra::{vector, Point2, Vector2};
use sprite_swarm_renderer::{Color, Renderable};

// Number of sprite variants in the sheet, particles cycle through them by index
pub const SPRITE_VARIANTS: usize = 3;

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub position: Point2<f32>,
    pub color: Color,

    pub moving_left: bool,
    pub moving_up: bool,

    // In [0, 1], picks the speed between the configured min and max
    pub speed_factor: f32,

    pub sprite_index: usize,

    // Reserved, nothing animates it yet
    pub rotation_angle: f32,

    pub scale: f32,
}

impl Particle {
    pub fn speed(&self, speed_min: f32, speed_max: f32) -> f32 {
        lerp(speed_min, speed_max, self.speed_factor)
    }
}

// Painter's order: larger y is further back and is drawn first
pub fn depth_order(a: &Particle, b: &Particle) -> Ordering {
    b.position.y.total_cmp(&a.position.y)
}

impl Renderable for Particle {
    fn sprite_index(&self) -> usize {
        self.sprite_index
    }

    fn position(&self) -> Point2<f32> {
        self.position
    }

    fn scale(&self) -> Vector2<f32> {
        vector![self.scale, self.scale]
    }

    fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    fn color(&self) -> Color {
        self.color
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cmp::Ordering;

    use nalgebra::{point, Point2};
    use sprite_swarm_renderer::{rgba8, Renderable};

    use crate::particle::{depth_order, lerp, Particle};

    pub(crate) fn particle_at(position: Point2<f32>, moving_left: bool, moving_up: bool) -> Particle {
        Particle {
            position,
            color: rgba8(113, 209, 129, 255),
            moving_left,
            moving_up,
            speed_factor: 0.0,
            sprite_index: 0,
            rotation_angle: 0.0,
            scale: 1.0,
        }
    }

    #[test]
    fn lerp_hits_endpoints() {
        assert_eq!(lerp(0.5, 2.0, 0.0), 0.5);
        assert_eq!(lerp(0.5, 2.0, 1.0), 2.0);
        assert_eq!(lerp(0.5, 2.0, 0.5), 1.25);
    }

    #[test]
    fn speed_interpolates_factor() {
        let mut p = particle_at(point![0.0, 0.0], false, false);
        p.speed_factor = 0.5;

        assert_eq!(p.speed(0.0, 2.0), 1.0);
    }

    #[test]
    fn higher_particles_sort_first() {
        let high = particle_at(point![0.0, 1.0], false, false);
        let low = particle_at(point![0.0, -1.0], false, false);

        assert_eq!(depth_order(&high, &low), Ordering::Less);
        assert_eq!(depth_order(&low, &high), Ordering::Greater);
        assert_eq!(depth_order(&low, &low), Ordering::Equal);
    }

    #[test]
    fn renders_as_uniformly_scaled_sprite() {
        let mut p = particle_at(point![1.0, 2.0], false, false);
        p.scale = 1.5;
        p.sprite_index = 2;

        assert!(p.is_visible());
        assert_eq!(p.sprite_index(), 2);
        assert_eq!(Renderable::position(&p), point![1.0, 2.0]);
        assert_eq!(p.scale().x, 1.5);
        assert_eq!(p.scale().y, 1.5);
        assert_eq!(p.rotation_angle(), 0.0);
    }
}
