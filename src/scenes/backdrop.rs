use crate::math::{hex_to_rgb, rgb_to_rgba8};

/// Side length of the backdrop bitmap
pub const BACKDROP_SIZE: u32 = 256;

/// Offscreen RGBA bitmap used as the scene background
#[derive(Clone)]
pub struct Canvas {
    /// RGBA pixel buffer
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create new transparent canvas with dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    /// Two-stop gradient from `top` (row 0) to `bottom` (last row), sampled
    /// at row centres - functional style
    pub fn with_vertical_gradient(mut self, top: u32, bottom: u32) -> Self {
        let top = hex_to_rgb(top);
        let bottom = hex_to_rgb(bottom);

        for y in 0..self.height {
            let t = (y as f32 + 0.5) / self.height as f32;
            let rgb = [
                top[0] + (bottom[0] - top[0]) * t,
                top[1] + (bottom[1] - top[1]) * t,
                top[2] + (bottom[2] - top[2]) * t,
            ];
            self.draw_hline(y, rgb_to_rgba8(rgb, 255));
        }
        self
    }

    /// Fill one full row
    fn draw_hline(&mut self, y: u32, rgba: [u8; 4]) {
        if y >= self.height {
            return;
        }
        let start = (y * self.width * 4) as usize;
        let end = start + (self.width * 4) as usize;
        for pixel in self.pixels[start..end].chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    /// Get pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(rgba)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The default square backdrop
pub fn gradient_backdrop(top: u32, bottom: u32) -> Canvas {
    Canvas::new(BACKDROP_SIZE, BACKDROP_SIZE).with_vertical_gradient(top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [u8; 4], b: [u8; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| (*x as i16 - y as i16).abs() <= 1)
    }

    #[test]
    fn test_canvas_new_is_transparent() {
        let canvas = Canvas::new(4, 4);
        assert_eq!(canvas.pixels().len(), 64);
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_gradient_endpoints() {
        let canvas = gradient_backdrop(0x667eea, 0x764ba2);
        assert_eq!(canvas.dimensions(), (256, 256));

        let top = canvas.pixel(0, 0).unwrap();
        let bottom = canvas.pixel(255, 255).unwrap();
        assert!(close(top, [0x66, 0x7e, 0xea, 255]), "top was {:?}", top);
        assert!(close(bottom, [0x76, 0x4b, 0xa2, 255]), "bottom was {:?}", bottom);
    }

    #[test]
    fn test_gradient_rows_are_uniform() {
        let canvas = gradient_backdrop(0x000000, 0xffffff);
        for y in [0, 17, 128, 255] {
            let first = canvas.pixel(0, y);
            assert!((1..256).all(|x| canvas.pixel(x, y) == first));
        }
    }

    #[test]
    fn test_gradient_is_monotonic_between_stops() {
        let canvas = gradient_backdrop(0x000000, 0xffffff);
        let column: Vec<u8> = (0..256).map(|y| canvas.pixel(0, y).unwrap()[0]).collect();
        assert!(column.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let canvas = Canvas::new(2, 2);
        assert_eq!(canvas.pixel(2, 0), None);
        assert_eq!(canvas.pixel(0, 2), None);
    }
}
