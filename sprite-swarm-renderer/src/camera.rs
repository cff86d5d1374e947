use nalgebra::Orthographic3;
use winit::dpi::PhysicalSize;

const Z_NEAR: f32 = -1.0;
const Z_FAR: f32 = 1.0;

// An orthographic camera centered on the origin. half_size is the vertical half extent of the
// view, the horizontal half extent follows from the aspect ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthographicCamera {
    half_size: f32,
    aspect_ratio: f32,
}

impl OrthographicCamera {
    pub fn new(half_size: f32, aspect_ratio: f32) -> Self {
        OrthographicCamera {
            half_size,
            aspect_ratio,
        }
    }

    pub fn half_size(&self) -> f32 {
        self.half_size
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn half_width(&self) -> f32 {
        self.half_size * self.aspect_ratio
    }

    pub fn aspect_ratio_updated(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio
    }

    pub fn resized(&mut self, new_size: PhysicalSize<u32>) {
        // A minimized window reports a zero height, keep the last usable aspect
        if new_size.height == 0 {
            return;
        }

        self.aspect_ratio_updated(new_size.width as f32 / new_size.height as f32)
    }

    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        let half_width = self.half_width();

        let proj = Orthographic3::new(
            -half_width,
            half_width,
            -self.half_size,
            self.half_size,
            Z_NEAR,
            Z_FAR,
        );

        proj.to_homogeneous().data.0
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Matrix4, Point3};
    use winit::dpi::PhysicalSize;

    use crate::camera::OrthographicCamera;

    #[test]
    fn resize_updates_aspect() {
        let mut camera = OrthographicCamera::new(5.0, 1.0);

        camera.resized(PhysicalSize::new(1600, 800));

        assert_eq!(camera.aspect_ratio(), 2.0);
        assert_eq!(camera.half_width(), 10.0);
    }

    #[test]
    fn zero_height_resize_is_ignored() {
        let mut camera = OrthographicCamera::new(5.0, 1.5);

        camera.resized(PhysicalSize::new(800, 0));

        assert_eq!(camera.aspect_ratio(), 1.5);
    }

    #[test]
    fn projection_maps_view_corner_to_clip_corner() {
        let camera = OrthographicCamera::new(2.0, 2.0);

        let m = Matrix4::from(camera.projection_matrix());
        let corner = m.transform_point(&Point3::new(4.0, 2.0, 0.0));

        assert!((corner.x - 1.0).abs() <= 0.0001);
        assert!((corner.y - 1.0).abs() <= 0.0001);
    }
}
