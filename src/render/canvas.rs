//! Pixel-level drawing primitives over an RGBA8 canvas.
//!
//! Every function here is self-contained: it takes the color and geometry it
//! needs as arguments and leaves no state behind for the next call.
//! Colors are straight (non-premultiplied) alpha, composited source-over.

use image::{Rgba, RgbaImage};

use crate::model::Color;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle from percent geometry where `cx`/`cy` is the center.
    pub fn from_center_percent(cx: f64, cy: f64, w: f64, h: f64, width: u32, height: u32) -> Self {
        let pw = (w / 100.0 * width as f64) as f32;
        let ph = (h / 100.0 * height as f64) as f32;
        let px = (cx / 100.0 * width as f64) as f32 - pw / 2.0;
        let py = (cy / 100.0 * height as f64) as f32 - ph / 2.0;
        Self::new(px, py, pw, ph)
    }

    pub fn inset(&self, by: f32) -> Self {
        Self::new(self.x + by, self.y + by, self.w - 2.0 * by, self.h - 2.0 * by)
    }

    /// True if the pixel center at (px, py) lies inside.
    pub fn contains_center(&self, px: u32, py: u32) -> bool {
        let cx = px as f32 + 0.5;
        let cy = py as f32 + 0.5;
        self.w > 0.0
            && self.h > 0.0
            && cx >= self.x
            && cx < self.x + self.w
            && cy >= self.y
            && cy < self.y + self.h
    }

    /// Integer pixel span clipped to the canvas, as `(x0, y0, x1, y1)` exclusive.
    pub fn pixel_span(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let clip = |v: f32, max: u32| v.max(0.0).min(max as f32) as u32;
        (
            clip(self.x.floor(), width),
            clip(self.y.floor(), height),
            clip((self.x + self.w).ceil(), width),
            clip((self.y + self.h).ceil(), height),
        )
    }
}

/// Single-channel coverage buffer (0.0 = empty, 1.0 = fully covered).
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Alpha channel of an image, with `pad` empty pixels on every side.
    pub fn from_alpha(image: &RgbaImage, pad: usize) -> Self {
        let mut mask = Mask::new(image.width() as usize + 2 * pad, image.height() as usize + 2 * pad);
        for (x, y, px) in image.enumerate_pixels() {
            let idx = (y as usize + pad) * mask.width + x as usize + pad;
            mask.data[idx] = px[3] as f32 / 255.0;
        }
        mask
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn accumulate(&mut self, x: i32, y: i32, coverage: f32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let idx = y as usize * self.width + x as usize;
            self.data[idx] = (self.data[idx] + coverage).min(1.0);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v <= 0.0)
    }
}

/// Blend one straight-alpha color over a pixel with extra `coverage`.
#[inline]
pub fn blend_pixel(dst: &mut Rgba<u8>, src: [u8; 4], coverage: f32) {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let sc = src[c] as f32;
        let dc = dst[c] as f32;
        let v = (sc * sa + dc * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Fill the whole canvas, replacing what is there.
pub fn clear(canvas: &mut RgbaImage, color: Color) {
    for px in canvas.pixels_mut() {
        *px = Rgba(color.to_rgba());
    }
}

pub fn fill_rect(canvas: &mut RgbaImage, rect: PixelRect, color: Color) {
    if color.a == 0 {
        return;
    }
    let (x0, y0, x1, y1) = rect.pixel_span(canvas.width(), canvas.height());
    let src = color.to_rgba();
    for y in y0..y1 {
        for x in x0..x1 {
            if rect.contains_center(x, y) {
                blend_pixel(canvas.get_pixel_mut(x, y), src, 1.0);
            }
        }
    }
}

/// Outline centered on the rectangle edge, `width` pixels thick.
pub fn stroke_rect(canvas: &mut RgbaImage, rect: PixelRect, width: f32, color: Color) {
    if width <= 0.0 || color.a == 0 {
        return;
    }
    let outer = rect.inset(-width / 2.0);
    let inner = rect.inset(width / 2.0);
    let (x0, y0, x1, y1) = outer.pixel_span(canvas.width(), canvas.height());
    let src = color.to_rgba();
    for y in y0..y1 {
        for x in x0..x1 {
            if outer.contains_center(x, y) && !inner.contains_center(x, y) {
                blend_pixel(canvas.get_pixel_mut(x, y), src, 1.0);
            }
        }
    }
}

/// Multiply the color channels inside `rect` by `tint`, weighted by its alpha.
pub fn multiply_rect(canvas: &mut RgbaImage, rect: PixelRect, tint: Color) {
    if tint.a == 0 {
        return;
    }
    let weight = tint.a as f32 / 255.0;
    let factors = [tint.r, tint.g, tint.b].map(|c| c as f32 / 255.0);
    let (x0, y0, x1, y1) = rect.pixel_span(canvas.width(), canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            if !rect.contains_center(x, y) {
                continue;
            }
            let px = canvas.get_pixel_mut(x, y);
            for c in 0..3 {
                let v = px[c] as f32;
                let multiplied = v * factors[c];
                px[c] = (v + (multiplied - v) * weight).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Draw an image with its top-left corner at (left, top).
pub fn draw_image(canvas: &mut RgbaImage, image: &RgbaImage, left: i64, top: i64) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for (x, y, px) in image.enumerate_pixels() {
        let dx = left + x as i64;
        let dy = top + y as i64;
        if dx < 0 || dy < 0 || dx >= cw || dy >= ch {
            continue;
        }
        blend_pixel(canvas.get_pixel_mut(dx as u32, dy as u32), px.0, 1.0);
    }
}

/// Paint `color` through a coverage mask whose top-left sits at (left, top).
pub fn draw_mask(canvas: &mut RgbaImage, mask: &Mask, left: i64, top: i64, color: Color) {
    if color.a == 0 {
        return;
    }
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let src = color.to_rgba();
    for my in 0..mask.height {
        let dy = top + my as i64;
        if dy < 0 || dy >= ch {
            continue;
        }
        for mx in 0..mask.width {
            let dx = left + mx as i64;
            if dx < 0 || dx >= cw {
                continue;
            }
            let coverage = mask.get(mx, my);
            if coverage > 0.0 {
                blend_pixel(canvas.get_pixel_mut(dx as u32, dy as u32), src, coverage);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_opaque_replaces() {
        let mut px = Rgba([10, 20, 30, 255]);
        blend_pixel(&mut px, [200, 100, 50, 255], 1.0);
        assert_eq!(px, Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn test_blend_half_over_opaque() {
        let mut px = Rgba([0, 0, 0, 255]);
        blend_pixel(&mut px, [255, 255, 255, 255], 0.5);
        assert_eq!(px[3], 255);
        assert!((px[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_blend_over_transparent_keeps_color() {
        let mut px = Rgba([0, 0, 0, 0]);
        blend_pixel(&mut px, [40, 80, 120, 128], 1.0);
        assert_eq!(px, Rgba([40, 80, 120, 128]));
    }

    #[test]
    fn test_center_percent_rect() {
        let r = PixelRect::from_center_percent(50.0, 50.0, 50.0, 25.0, 600, 960);
        assert_eq!(r, PixelRect::new(150.0, 360.0, 300.0, 240.0));
    }

    #[test]
    fn test_stroke_leaves_interior() {
        let mut canvas = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        stroke_rect(&mut canvas, PixelRect::new(4.0, 4.0, 12.0, 12.0), 2.0, Color::BLACK);
        assert_eq!(canvas.get_pixel(4, 10), &Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(10, 10), &Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_multiply_rect() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255]));
        multiply_rect(&mut canvas, PixelRect::new(0.0, 0.0, 2.0, 4.0), Color::rgb(255, 0, 128));
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([200, 0, 100, 255]));
        assert_eq!(canvas.get_pixel(3, 0), &Rgba([200, 200, 200, 255]));
    }

    #[test]
    fn test_mask_from_alpha_padding() {
        let img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        let mask = Mask::from_alpha(&img, 1);
        assert_eq!((mask.width, mask.height), (4, 3));
        assert_eq!(mask.get(1, 1), 1.0);
        assert_eq!(mask.get(0, 0), 0.0);
    }
}
