use std::f32::consts::PI;

use nalgebra::{point, vector, Matrix3, Point2, Rotation2, Scale2, Translation2, Vector2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteTransform {
    pub position: Point2<f32>,
    // degrees
    pub rotation: f32,
    pub scale: Vector2<f32>,
}

impl SpriteTransform {
    pub fn identity() -> Self {
        Self {
            position: point![0.0, 0.0],
            rotation: 0.0,
            scale: vector![1.0, 1.0],
        }
    }

    pub fn new(position: Point2<f32>, rotation: f32, scale: Vector2<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn to_homogeneous(&self) -> Matrix3<f32> {
        let translation = Translation2::new(self.position.x, self.position.y).to_homogeneous();
        let rotation = Rotation2::new(self.rotation * (PI / 180.0)).to_homogeneous();
        let scale = Scale2::new(self.scale.x, self.scale.y).to_homogeneous();

        translation * rotation * scale
    }
}
