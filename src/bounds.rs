use serde::{Deserialize, Serialize};
use sprite_swarm_renderer::OrthographicCamera;
use winit::dpi::PhysicalSize;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Bounds {
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    // A rectangle centered on the origin
    pub const fn centered(half_width: f32, half_height: f32) -> Self {
        Self::new(-half_width, half_width, -half_height, half_height)
    }

    pub fn from_camera(camera: &OrthographicCamera) -> Self {
        Self::centered(camera.half_width(), camera.half_size())
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    // True when either axis has no room to move in
    pub fn is_degenerate(&self) -> bool {
        self.x_min >= self.x_max || self.y_min >= self.y_max
    }

    // Every edge and both spans are finite, so the rectangle can be sampled
    pub fn is_finite(&self) -> bool {
        [self.x_min, self.x_max, self.y_min, self.y_max, self.width(), self.height()]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn grown(&self, margin: f32) -> Self {
        Self::new(
            self.x_min - margin,
            self.x_max + margin,
            self.y_min - margin,
            self.y_max + margin,
        )
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }
}

pub trait BoundsProvider {
    // Called once per frame, the answer may change between frames
    fn bounds(&self) -> Bounds;
}

impl BoundsProvider for Bounds {
    fn bounds(&self) -> Bounds {
        *self
    }
}

impl BoundsProvider for OrthographicCamera {
    fn bounds(&self) -> Bounds {
        Bounds::from_camera(self)
    }
}

// Camera bounds when a camera is attached, a fixed rectangle otherwise
#[derive(Debug, Copy, Clone)]
pub enum BoundsSource {
    Camera(OrthographicCamera),
    Static(Bounds),
}

impl BoundsSource {
    pub fn camera(&self) -> Option<&OrthographicCamera> {
        match self {
            BoundsSource::Camera(camera) => Some(camera),
            BoundsSource::Static(_) => None,
        }
    }

    pub fn resized(&mut self, new_size: PhysicalSize<u32>) {
        if let BoundsSource::Camera(camera) = self {
            camera.resized(new_size)
        }
    }
}

impl BoundsProvider for BoundsSource {
    fn bounds(&self) -> Bounds {
        match self {
            BoundsSource::Camera(camera) => camera.bounds(),
            BoundsSource::Static(bounds) => bounds.bounds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use sprite_swarm_renderer::OrthographicCamera;
    use winit::dpi::PhysicalSize;

    use crate::bounds::{Bounds, BoundsProvider, BoundsSource};

    #[test]
    fn camera_bounds_follow_aspect() {
        let camera = OrthographicCamera::new(5.0, 2.0);

        assert_eq!(camera.bounds(), Bounds::new(-10.0, 10.0, -5.0, 5.0));
    }

    #[test]
    fn static_source_ignores_resize() {
        let mut source = BoundsSource::Static(Bounds::centered(1.0, 1.0));

        source.resized(PhysicalSize::new(1920, 1080));

        assert_eq!(source.bounds(), Bounds::centered(1.0, 1.0));
        assert!(source.camera().is_none());
    }

    #[test]
    fn camera_source_recomputes_after_resize() {
        let mut source = BoundsSource::Camera(OrthographicCamera::new(2.0, 1.0));
        assert_eq!(source.bounds(), Bounds::centered(2.0, 2.0));

        source.resized(PhysicalSize::new(400, 200));

        assert_eq!(source.bounds(), Bounds::centered(4.0, 2.0));
    }

    #[test]
    fn zero_width_camera_is_degenerate() {
        let bounds = OrthographicCamera::new(3.0, 0.0).bounds();

        assert!(bounds.is_degenerate());
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 6.0);
    }

    #[test]
    fn grown_contains_overshoot() {
        let bounds = Bounds::centered(1.0, 1.0);

        assert!(!bounds.contains(1.05, 0.0));
        assert!(bounds.grown(0.1).contains(1.05, 0.0));
    }

    #[test]
    fn overflowing_span_is_not_finite() {
        assert!(Bounds::centered(3.0, 3.0).is_finite());
        assert!(!Bounds::new(-3.0e38, 3.0e38, -1.0, 1.0).is_finite());
        assert!(!Bounds::new(f32::NEG_INFINITY, 1.0, -1.0, 1.0).is_finite());
        assert!(!Bounds::new(-1.0, 1.0, f32::NAN, 1.0).is_finite());
    }
}
