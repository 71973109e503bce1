// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The finished frame, as handed to whoever displays it.

use image::{ImageBuffer, Rgb, RgbImage};
use std::slice::Chunks;

use planes::{Canvas, Pixel};

/// A complete render: one color per pixel, row-major, top row first.
/// Only a fully composited frame is ever turned into one of these.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    canvas: Canvas,
    pixels: Vec<Rgb<u8>>,
}

impl PixelBuffer {
    pub(crate) fn from_parts(canvas: Canvas, pixels: Vec<Rgb<u8>>) -> PixelBuffer {
        debug_assert_eq!(canvas.len(), pixels.len());
        PixelBuffer { canvas, pixels }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.canvas.0
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.canvas.1
    }

    /// Both dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The color of one pixel, or `None` if it is off the canvas.
    pub fn get(&self, pixel: &Pixel) -> Option<Rgb<u8>> {
        if pixel.0 >= self.canvas.0 || pixel.1 >= self.canvas.1 {
            return None;
        }
        Some(self.pixels[pixel.1 * self.canvas.0 + pixel.0])
    }

    /// Every pixel, row-major.
    pub fn pixels(&self) -> &[Rgb<u8>] {
        &self.pixels
    }

    /// The frame one row at a time, top to bottom.
    pub fn rows(&self) -> Chunks<Rgb<u8>> {
        self.pixels.chunks(self.canvas.0)
    }

    /// Packed 8-bit RGB triples, ready for an encoder or a texture upload.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.0.iter().cloned()).collect()
    }

    /// Hand the frame over as an `image` buffer.
    pub fn into_image(self) -> RgbImage {
        let width = self.canvas.0;
        let pixels = self.pixels;
        ImageBuffer::from_fn(self.canvas.0 as u32, self.canvas.1 as u32, |x, y| {
            pixels[(y as usize) * width + (x as usize)]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped() -> PixelBuffer {
        let pixels = vec![
            Rgb([1, 2, 3]),
            Rgb([4, 5, 6]),
            Rgb([7, 8, 9]),
            Rgb([10, 11, 12]),
            Rgb([13, 14, 15]),
            Rgb([16, 17, 18]),
        ];
        PixelBuffer::from_parts(Canvas(3, 2), pixels)
    }

    #[test]
    fn get_is_row_major() {
        let buffer = striped();
        assert_eq!(buffer.get(&Pixel(0, 0)), Some(Rgb([1, 2, 3])));
        assert_eq!(buffer.get(&Pixel(2, 0)), Some(Rgb([7, 8, 9])));
        assert_eq!(buffer.get(&Pixel(0, 1)), Some(Rgb([10, 11, 12])));
        assert_eq!(buffer.get(&Pixel(3, 0)), None);
        assert_eq!(buffer.get(&Pixel(0, 2)), None);
    }

    #[test]
    fn rows_split_on_width() {
        let buffer = striped();
        let rows: Vec<&[Rgb<u8>]> = buffer.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], Rgb([10, 11, 12]));
    }

    #[test]
    fn bytes_are_packed() {
        let bytes = striped().to_rgb_bytes();
        assert_eq!(bytes.len(), 18);
        assert_eq!(&bytes[..6], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn image_keeps_placement() {
        let image = striped().into_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(*image.get_pixel(2, 1), Rgb([16, 17, 18]));
    }
}
