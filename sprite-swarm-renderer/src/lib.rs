use nalgebra::{Point2, Vector2, Vector4};
use winit::dpi::PhysicalSize;

// These are the only exports
pub use batcher::SpriteBatcher;
pub use camera::OrthographicCamera;
pub use mesh::{SpriteMesh, SpriteVertex, INDICES_PER_SPRITE, VERTICES_PER_SPRITE};
pub use sheet::SpriteSheet;
pub use transform::SpriteTransform;

mod batcher;
mod camera;
mod mesh;
mod sheet;
mod transform;

// Normalized RGBA
pub type Color = Vector4<f32>;

pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Color {
    Vector4::new(r, g, b, a).map(|c| c as f32 / 255.0)
}

// Renderable is everything the batcher needs to know about a sprite. The simulation never sees
// a concrete mesh type, only this.
pub trait Renderable {
    fn is_visible(&self) -> bool {
        true
    }
    fn sprite_index(&self) -> usize;
    fn position(&self) -> Point2<f32>;
    fn scale(&self) -> Vector2<f32>;
    // degrees
    fn rotation_angle(&self) -> f32;
    fn color(&self) -> Color;
}

pub trait SpriteRenderer {
    fn resized(&mut self, new_size: PhysicalSize<u32>);
    fn rescaled(&mut self, new_scale_factor: f64);
    fn draw(&mut self, camera: &OrthographicCamera, mesh: &SpriteMesh);
}
