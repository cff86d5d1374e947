use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use sprite_swarm_renderer::{rgba8, Color};

use crate::error::Result;

// The five colors every swarm is painted with, all equally likely
pub const DEFAULT_PALETTE: [([u8; 4], f32); 5] = [
    ([113, 209, 129, 255], 1.0),
    ([250, 128, 114, 255], 1.0),
    ([66, 120, 217, 255], 1.0),
    ([167, 173, 175, 255], 1.0),
    ([206, 210, 136, 255], 1.0),
];

pub struct WeightedPalette {
    colors: Vec<Color>,
    weights: WeightedIndex<f32>,
}

impl WeightedPalette {
    pub fn new(entries: impl IntoIterator<Item = (Color, f32)>) -> Result<Self> {
        let (colors, weights): (Vec<Color>, Vec<f32>) = entries.into_iter().unzip();

        Ok(WeightedPalette {
            weights: WeightedIndex::new(&weights)?,
            colors,
        })
    }

    pub fn from_rgba8(entries: &[([u8; 4], f32)]) -> Result<Self> {
        Self::new(
            entries
                .iter()
                .map(|([r, g, b, a], weight)| (rgba8(*r, *g, *b, *a), *weight)),
        )
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors[self.weights.sample(rng)]
    }
}
