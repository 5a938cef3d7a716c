/// Window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Drawable size for a window whose physical size was produced with
    /// `scale_factor`, re-rendered at no more than `max_pixel_ratio` device
    /// pixels per logical pixel.
    pub fn capped(width: u32, height: u32, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        if scale_factor <= max_pixel_ratio || scale_factor <= 0.0 {
            return Self::new(width, height);
        }
        let ratio = max_pixel_ratio / scale_factor;
        Self::new(
            (width as f64 * ratio).round() as u32,
            (height as f64 * ratio).round() as u32,
        )
    }

    /// Width over height; 1.0 for a degenerate window
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
