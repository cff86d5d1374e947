use nalgebra::{point, Point2};

// A texture atlas laid out as a single horizontal strip of equally sized sprites
#[derive(Debug, Copy, Clone)]
pub struct SpriteSheet {
    variants: usize,
}

impl SpriteSheet {
    pub fn strip(variants: usize) -> Self {
        SpriteSheet {
            variants: variants.max(1),
        }
    }

    pub fn variants(&self) -> usize {
        self.variants
    }

    // Returns the (min, max) texture coordinates for a sprite. Out of range indices wrap
    pub fn uv_rect(&self, sprite_index: usize) -> (Point2<f32>, Point2<f32>) {
        let width = 1.0 / self.variants as f32;
        let u = (sprite_index % self.variants) as f32 * width;

        (point![u, 0.0], point![u + width, 1.0])
    }
}
