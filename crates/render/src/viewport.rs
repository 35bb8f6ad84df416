/// Upper bound for the render pixel ratio.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Result of a resize, for whoever owns the camera and render target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportChange {
    pub aspect: f32,
    pub pixel_ratio: f32,
    pub physical_width: u32,
    pub physical_height: u32,
}

/// Logical size of the drawing area plus the effective pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }

    /// Render target size in pixels, never zero.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            ((self.width * self.pixel_ratio).round() as u32).max(1),
            ((self.height * self.pixel_ratio).round() as u32).max(1),
        )
    }

    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> ViewportChange {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        let (physical_width, physical_height) = self.physical_size();
        tracing::debug!(
            width,
            height,
            pixel_ratio = self.pixel_ratio,
            physical_width,
            physical_height,
            "viewport resized"
        );
        ViewportChange {
            aspect: self.aspect(),
            pixel_ratio: self.pixel_ratio,
            physical_width,
            physical_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_clamped() {
        let mut vp = Viewport::default();
        let change = vp.resize(800.0, 600.0, 3.0);
        assert_eq!(change.pixel_ratio, 2.0);
        assert_eq!((change.physical_width, change.physical_height), (1600, 1200));

        let change = vp.resize(800.0, 600.0, 1.25);
        assert_eq!(change.pixel_ratio, 1.25);
        assert_eq!(change.physical_width, 1000);
    }

    #[test]
    fn aspect_follows_last_resize() {
        let mut vp = Viewport::default();
        vp.resize(800.0, 600.0, 1.0);
        let change = vp.resize(1000.0, 500.0, 1.0);
        assert_eq!(change.aspect, 2.0);
        assert_eq!(vp.aspect(), 2.0);
    }

    #[test]
    fn minimized_window_keeps_a_valid_target() {
        let mut vp = Viewport::default();
        let change = vp.resize(0.0, 0.0, 1.0);
        assert_eq!((change.physical_width, change.physical_height), (1, 1));
        assert!(change.aspect.is_finite());
    }
}
