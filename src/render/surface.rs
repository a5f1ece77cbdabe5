use image::{imageops, imageops::FilterType, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::video::VideoFrame;

/// Drawing primitives over a 2D pixel grid sized to the video feed. The
/// overlay renderer is written against this seam so tests can substitute a
/// call-recording fake.
pub trait Surface: Send {
    fn clear(&mut self);
    /// Blit the live frame across the full surface.
    fn draw_frame(&mut self, frame: &VideoFrame);
    /// Draw `sprite` scaled to a `size` x `size` square with its top-left
    /// corner at (x, y). Off-surface portions are clipped.
    fn draw_sprite(&mut self, sprite: &RgbaImage, x: f32, y: f32, size: u32);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: i32, color: [u8; 4]);
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: u32, color: [u8; 4]);
}

/// Surface backed by an RGBA buffer.
pub struct ImageSurface {
    canvas: RgbaImage,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }
}

impl Surface for ImageSurface {
    fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 255]);
        }
    }

    fn draw_frame(&mut self, frame: &VideoFrame) {
        let (width, height) = self.canvas.dimensions();
        if frame.pixels.dimensions() == (width, height) {
            imageops::overlay(&mut self.canvas, &*frame.pixels, 0, 0);
        } else {
            let scaled = imageops::resize(&*frame.pixels, width, height, FilterType::Triangle);
            imageops::overlay(&mut self.canvas, &scaled, 0, 0);
        }
    }

    fn draw_sprite(&mut self, sprite: &RgbaImage, x: f32, y: f32, size: u32) {
        let scaled = if sprite.dimensions() == (size, size) {
            sprite.clone()
        } else {
            imageops::resize(sprite, size, size, FilterType::Triangle)
        };
        imageops::overlay(&mut self.canvas, &scaled, x.round() as i64, y.round() as i64);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: i32, color: [u8; 4]) {
        draw_filled_circle_mut(
            &mut self.canvas,
            (cx.round() as i32, cy.round() as i32),
            radius,
            Rgba(color),
        );
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: u32, color: [u8; 4]) {
        let steep = (to.1 - from.1).abs() > (to.0 - from.0).abs();
        let spread = thickness.max(1);
        for t in 0..spread {
            // fan extra strokes out along the minor axis, centered on the line
            let offset = t as f32 - (spread - 1) as f32 / 2.0;
            let (ox, oy) = if steep { (offset, 0.0) } else { (0.0, offset) };
            draw_line_segment_mut(
                &mut self.canvas,
                (from.0 + ox, from.1 + oy),
                (to.0 + ox, to.1 + oy),
                Rgba(color),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn solid_frame(width: u32, height: u32, color: [u8; 4]) -> VideoFrame {
        VideoFrame {
            width,
            height,
            pixels: Arc::new(RgbaImage::from_pixel(width, height, Rgba(color))),
        }
    }

    #[test]
    fn frame_blit_fills_the_canvas() {
        let mut surface = ImageSurface::new(8, 8);
        surface.clear();
        surface.draw_frame(&solid_frame(8, 8, [10, 20, 30, 255]));
        assert_eq!(surface.canvas().get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_eq!(surface.canvas().get_pixel(7, 7).0, [10, 20, 30, 255]);
    }

    #[test]
    fn mismatched_frame_is_scaled_to_surface_dimensions() {
        let mut surface = ImageSurface::new(8, 8);
        surface.clear();
        surface.draw_frame(&solid_frame(4, 4, [50, 60, 70, 255]));
        assert_eq!(surface.canvas().get_pixel(7, 7).0, [50, 60, 70, 255]);
    }

    #[test]
    fn sprite_clips_when_partly_off_surface() {
        let mut surface = ImageSurface::new(8, 8);
        surface.clear();
        let sprite = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 0, 255]));
        surface.draw_sprite(&sprite, -2.0, -2.0, 4);
        assert_eq!(surface.canvas().get_pixel(1, 1).0, [255, 255, 0, 255]);
        assert_eq!(surface.canvas().get_pixel(4, 4).0, [0, 0, 0, 255]);
    }
}
