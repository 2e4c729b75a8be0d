use image::{Rgba, RgbaImage};

use crate::color::Rgb;

/// A fixed-size RGBA pixel buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, background.to_rgba()),
        }
    }

    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Write one pixel. Out-of-bounds writes are dropped.
    pub fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if self.in_bounds(x, y) {
            self.pixels.put_pixel(x as u32, y as u32, color);
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        let color = color.to_rgba();
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    /// Overwrite this canvas with the contents of `other`, which must be the same size.
    pub fn copy_from(&mut self, other: &Canvas) {
        debug_assert_eq!(self.size(), other.size());
        self.pixels.copy_from_slice(other.as_raw());
    }

    /// Paint `source` with its top-left corner at the origin, clipping whatever
    /// falls outside. Pixels not covered by `source` are left alone.
    pub fn blit(&mut self, source: &RgbaImage) {
        let width = self.width().min(source.width());
        let height = self.height().min(source.height());
        for y in 0..height {
            for x in 0..width {
                self.pixels.put_pixel(x, y, *source.get_pixel(x, y));
            }
        }
    }

    /// A new canvas of the given size holding the overlapping region of this one.
    /// Newly exposed pixels take `background`.
    pub fn resized(&self, width: u32, height: u32, background: Rgb) -> Canvas {
        let mut canvas = Canvas::new(width, height, background);
        canvas.blit(&self.pixels);
        canvas
    }

    /// Every pixel that is not `color`. Handy in tests and for cheap emptiness checks.
    pub fn count_not(&self, color: Rgb) -> usize {
        let color = color.to_rgba();
        self.pixels.pixels().filter(|p| **p != color).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb = Rgb::new(0x0F, 0x17, 0x2A);

    #[test]
    fn test_new_canvas_is_background() {
        let canvas = Canvas::new(8, 4, BG);
        assert_eq!(canvas.size(), [8, 4]);
        assert_eq!(canvas.count_not(BG), 0);
        assert_eq!(canvas.pixel(7, 3), Some(BG.to_rgba()));
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn test_put_out_of_bounds_is_dropped() {
        let mut canvas = Canvas::new(4, 4, BG);
        canvas.put(-1, 0, Rgb::WHITE.to_rgba());
        canvas.put(4, 4, Rgb::WHITE.to_rgba());
        assert_eq!(canvas.count_not(BG), 0);
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut canvas = Canvas::new(4, 4, BG);
        canvas.put(1, 1, Rgb::WHITE.to_rgba());
        canvas.put(3, 3, Rgb::WHITE.to_rgba());

        let grown = canvas.resized(6, 5, BG);
        assert_eq!(grown.size(), [6, 5]);
        assert_eq!(grown.pixel(1, 1), Some(Rgb::WHITE.to_rgba()));
        assert_eq!(grown.pixel(3, 3), Some(Rgb::WHITE.to_rgba()));
        assert_eq!(grown.count_not(BG), 2);

        let shrunk = canvas.resized(2, 2, BG);
        assert_eq!(shrunk.pixel(1, 1), Some(Rgb::WHITE.to_rgba()));
        assert_eq!(shrunk.count_not(BG), 1);
    }
}
