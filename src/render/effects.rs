//! Shadow, outline and tone effects.

use image::RgbaImage;
use rayon::prelude::*;

use super::canvas::{self, Mask};
use crate::model::{Color, Shadow};

/// Largest padding any effect may add around a mask, in pixels.
pub const MAX_PADDING: usize = 512;

/// Pixels of padding needed around a mask so a blur of `sigma` is not clipped.
pub fn blur_padding(sigma: f32) -> usize {
    if !sigma.is_finite() || sigma <= 0.0 {
        0
    } else {
        ((sigma * 3.0).ceil() as usize).min(MAX_PADDING)
    }
}

/// Shadow blur in canvas units maps to a gaussian with sigma = blur / 2.
pub fn shadow_sigma(shadow: &Shadow, scale: f32) -> f32 {
    (shadow.blur as f32 * scale) / 2.0
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = blur_padding(sigma) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Separable gaussian blur. Samples outside the mask count as empty.
pub fn gaussian_blur(mask: &Mask, sigma: f32) -> Mask {
    if sigma <= 0.0 || mask.width == 0 || mask.height == 0 {
        return mask.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as i64;
    let (w, h) = (mask.width, mask.height);

    let mut tmp = vec![0.0f32; w * h];
    tmp.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (ki, &kw) in kernel.iter().enumerate() {
                let sx = x as i64 + ki as i64 - radius;
                if sx >= 0 && (sx as usize) < w {
                    acc += kw * mask.data[y * w + sx as usize];
                }
            }
            *out = acc;
        }
    });

    let mut out = vec![0.0f32; w * h];
    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (ki, &kw) in kernel.iter().enumerate() {
                let sy = y as i64 + ki as i64 - radius;
                if sy >= 0 && (sy as usize) < h {
                    acc += kw * tmp[sy as usize * w + x];
                }
            }
            *px = acc.min(1.0);
        }
    });

    Mask {
        width: w,
        height: h,
        data: out,
    }
}

/// Grow coverage outward by `radius` pixels (max filter over a disc).
pub fn dilate(mask: &Mask, radius: f32) -> Mask {
    if radius <= 0.0 || mask.width == 0 {
        return mask.clone();
    }
    let r = radius.ceil() as i64;
    let r2 = radius * radius;
    let offsets: Vec<(i64, i64)> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f32) <= r2)
        .collect();
    let (w, h) = (mask.width as i64, mask.height as i64);

    let mut out = vec![0.0f32; mask.data.len()];
    out.par_chunks_mut(mask.width).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            let mut best = 0.0f32;
            for &(dx, dy) in &offsets {
                let sx = x as i64 + dx;
                let sy = y as i64 + dy;
                if sx >= 0 && sy >= 0 && sx < w && sy < h {
                    best = best.max(mask.data[(sy * w + sx) as usize]);
                    if best >= 1.0 {
                        break;
                    }
                }
            }
            *px = best;
        }
    });

    Mask {
        width: mask.width,
        height: mask.height,
        data: out,
    }
}

/// Paint a blurred copy of `mask` in the shadow color.
///
/// `mask` must already carry [`blur_padding`] pixels of margin; its top-left
/// corner is placed at (left, top).
pub fn draw_shadow(
    canvas: &mut RgbaImage,
    mask: &Mask,
    left: i64,
    top: i64,
    sigma: f32,
    color: Color,
) {
    if sigma <= 0.0 || color.a == 0 {
        return;
    }
    let blurred = gaussian_blur(mask, sigma);
    canvas::draw_mask(canvas, &blurred, left, top, color);
}

/// CSS-style `brightness(b%) contrast(c%)` on the color channels.
pub fn adjust_tone(image: &mut RgbaImage, brightness: f64, contrast: f64) {
    let b = (brightness / 100.0) as f32;
    let c = (contrast / 100.0) as f32;
    let lut: Vec<u8> = (0..=255u32)
        .map(|v| {
            let bright = v as f32 / 255.0 * b;
            let contrasted = (bright - 0.5) * c + 0.5;
            (contrasted.clamp(0.0, 1.0) * 255.0).round() as u8
        })
        .collect();
    for px in image.pixels_mut() {
        for ch in 0..3 {
            px[ch] = lut[px[ch] as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_kernel_sums_to_one() {
        let k = gaussian_kernel(2.5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(k.len(), 2 * blur_padding(2.5) + 1);
    }

    #[test]
    fn test_blur_spreads_and_preserves_mass() {
        let mut mask = Mask::new(21, 21);
        mask.data[10 * 21 + 10] = 1.0;
        let blurred = gaussian_blur(&mask, 1.5);
        assert!(blurred.get(10, 10) < 1.0);
        assert!(blurred.get(12, 10) > 0.0);
        let total: f32 = blurred.data.iter().sum();
        assert!((total - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut mask = Mask::new(3, 3);
        mask.data[4] = 0.7;
        assert_eq!(gaussian_blur(&mask, 0.0), mask);
    }

    #[test]
    fn test_dilate_grows_disc() {
        let mut mask = Mask::new(9, 9);
        mask.data[4 * 9 + 4] = 1.0;
        let grown = dilate(&mask, 2.0);
        assert_eq!(grown.get(6, 4), 1.0);
        assert_eq!(grown.get(4, 2), 1.0);
        assert_eq!(grown.get(6, 6), 0.0);
    }

    #[test]
    fn test_neutral_tone_is_identity() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([12, 130, 250, 200]));
        adjust_tone(&mut img, 100.0, 100.0);
        assert_eq!(img.get_pixel(1, 1), &Rgba([12, 130, 250, 200]));
    }

    #[test]
    fn test_brightness_and_contrast() {
        let mut dark = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 0, 255]));
        adjust_tone(&mut dark, 50.0, 100.0);
        assert_eq!(dark.get_pixel(0, 0), &Rgba([100, 50, 0, 255]));

        let mut flat = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 128, 255]));
        adjust_tone(&mut flat, 100.0, 0.0);
        assert_eq!(flat.get_pixel(0, 0), &Rgba([128, 128, 128, 255]));
    }
}
