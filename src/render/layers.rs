//! Background, photo and signature drawing.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use super::canvas::{self, Mask, PixelRect};
use super::effects::{self, blur_padding, shadow_sigma};
use super::recolor::recolor_image;
use crate::model::{Color, Layer};

/// Shown when a side has no background or it failed to load.
pub const FALLBACK_BACKGROUND: Color = Color::WHITE;

/// Pixel rectangle of a layer on a canvas of the given size.
pub fn layer_rect(layer: &Layer, width: u32, height: u32) -> PixelRect {
    PixelRect::from_center_percent(layer.x, layer.y, layer.w, layer.h, width, height)
}

/// Paint the fallback color, then the background stretched to cover the card.
pub fn draw_background(canvas: &mut RgbaImage, background: Option<&DynamicImage>) {
    canvas::clear(canvas, FALLBACK_BACKGROUND);
    if let Some(image) = background {
        let cover = image
            .resize_to_fill(canvas.width(), canvas.height(), FilterType::Lanczos3)
            .to_rgba8();
        canvas::draw_image(canvas, &cover, 0, 0);
    }
}

/// Photo: cover-fit into the rectangle.
///
/// Order: shadow, stroke, image, overlay, then a multiply tint when colorize
/// is on.
pub fn draw_photo(canvas: &mut RgbaImage, layer: &Layer, photo: &DynamicImage, scale: f32) {
    if !layer.visible {
        return;
    }
    let layer = &clamped(layer);
    let rect = layer_rect(layer, canvas.width(), canvas.height());
    let Some((w, h)) = pixel_size(rect) else {
        return;
    };

    let mut fitted = photo.resize_to_fill(w, h, FilterType::Lanczos3).to_rgba8();
    if layer.has_adjust() {
        effects::adjust_tone(&mut fitted, layer.brightness, layer.contrast);
    }

    let left = rect.x.round() as i64;
    let top = rect.y.round() as i64;
    draw_framed(canvas, &fitted, left, top, rect, layer, scale);

    if layer.overlay.is_active() {
        canvas::fill_rect(canvas, rect, layer.overlay.effective_color());
    }
    if layer.colorize {
        canvas::multiply_rect(canvas, rect, layer.colorize_color);
    }
}

/// Signature: contain-fit and centered in the rectangle.
///
/// With colorize on, the ink is recolored and brightness/contrast are
/// skipped.
pub fn draw_signature(
    canvas: &mut RgbaImage,
    layer: &Layer,
    signature: &DynamicImage,
    scale: f32,
) {
    if !layer.visible {
        return;
    }
    let layer = &clamped(layer);
    let rect = layer_rect(layer, canvas.width(), canvas.height());
    let Some((w, h)) = pixel_size(rect) else {
        return;
    };

    let mut fitted = signature.resize(w, h, FilterType::Lanczos3).to_rgba8();
    if layer.colorize {
        recolor_image(&mut fitted, layer.colorize_color);
    } else if layer.has_adjust() {
        effects::adjust_tone(&mut fitted, layer.brightness, layer.contrast);
    }

    let left = (rect.x + (rect.w - fitted.width() as f32) / 2.0).round() as i64;
    let top = (rect.y + (rect.h - fitted.height() as f32) / 2.0).round() as i64;
    draw_framed(canvas, &fitted, left, top, rect, layer, scale);
}

fn clamped(layer: &Layer) -> Layer {
    let mut layer = layer.clone();
    layer.clamp_all();
    layer
}

fn pixel_size(rect: PixelRect) -> Option<(u32, u32)> {
    let w = rect.w.round();
    let h = rect.h.round();
    (w >= 1.0 && h >= 1.0).then_some((w as u32, h as u32))
}

/// Shadow cast by the image's alpha, the rectangle outline, then the image.
fn draw_framed(
    canvas: &mut RgbaImage,
    image: &RgbaImage,
    left: i64,
    top: i64,
    rect: PixelRect,
    layer: &Layer,
    scale: f32,
) {
    if layer.shadow.is_active() {
        let sigma = shadow_sigma(&layer.shadow, scale);
        let pad = blur_padding(sigma);
        let mask = Mask::from_alpha(image, pad);
        let offset = pad as i64;
        effects::draw_shadow(canvas, &mask, left - offset, top - offset, sigma, layer.shadow.color);
    }
    if layer.stroke.is_active() {
        canvas::stroke_rect(canvas, rect, layer.stroke.width as f32 * scale, layer.stroke.color);
    }
    canvas::draw_image(canvas, image, left, top);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Overlay, Shadow, Stroke};
    use image::Rgba;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(WHITE))
    }

    fn solid(w: u32, h: u32, px: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(px)))
    }

    #[test]
    fn test_missing_background_is_white() {
        let mut canvas = RgbaImage::from_pixel(6, 6, Rgba([1, 2, 3, 4]));
        draw_background(&mut canvas, None);
        assert!(canvas.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn test_background_covers_canvas() {
        let mut canvas = blank(60, 96);
        draw_background(&mut canvas, Some(&solid(10, 10, [0, 128, 0, 255])));
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 128, 0, 255]);
        assert_eq!(canvas.get_pixel(59, 95).0, [0, 128, 0, 255]);
    }

    #[test]
    fn test_photo_fills_rect() {
        let mut canvas = blank(100, 100);
        let layer = Layer::new(50.0, 50.0, 40.0, 20.0);
        draw_photo(&mut canvas, &layer, &solid(7, 3, [200, 0, 0, 255]), 1.0);
        assert_eq!(canvas.get_pixel(50, 50).0, [200, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(31, 41).0, [200, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(50, 35).0, WHITE);
        assert_eq!(canvas.get_pixel(25, 50).0, WHITE);
    }

    #[test]
    fn test_hidden_photo_skipped() {
        let mut canvas = blank(20, 20);
        let layer = Layer::new(50.0, 50.0, 50.0, 50.0).hidden();
        draw_photo(&mut canvas, &layer, &solid(4, 4, [0, 0, 0, 255]), 1.0);
        assert!(canvas.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn test_photo_overlay_and_tint() {
        let mut canvas = blank(100, 100);
        let mut layer = Layer::new(50.0, 50.0, 40.0, 40.0);
        layer.overlay = Overlay {
            color: Color::WHITE,
            opacity: 100.0,
        };
        layer.colorize = true;
        layer.colorize_color = Color::rgb(255, 0, 0);
        draw_photo(&mut canvas, &layer, &solid(4, 4, [0, 0, 0, 255]), 1.0);
        // White overlay hides the photo, the multiply tint keeps only red.
        assert_eq!(canvas.get_pixel(50, 50).0, [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(5, 5).0, WHITE);
    }

    #[test]
    fn test_photo_stroke_and_shadow_outside_rect() {
        let mut canvas = blank(100, 100);
        let mut layer = Layer::new(50.0, 50.0, 40.0, 40.0);
        layer.stroke = Stroke {
            width: 4.0,
            color: Color::rgb(0, 0, 255),
        };
        layer.shadow = Shadow {
            blur: 6.0,
            color: Color::BLACK,
        };
        draw_photo(&mut canvas, &layer, &solid(4, 4, [0, 255, 0, 255]), 1.0);
        // Outer half of the stroke sits just outside the rectangle edge.
        assert_eq!(canvas.get_pixel(29, 50).0, [0, 0, 255, 255]);
        // Shadow darkens pixels beyond the stroke.
        let beyond = canvas.get_pixel(25, 50).0;
        assert!(beyond[0] < 255);
        assert_eq!(canvas.get_pixel(50, 50).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_signature_contain_fit_centers() {
        let mut canvas = blank(100, 100);
        let layer = Layer::new(50.0, 50.0, 40.0, 40.0);
        // 4:1 image in a square: 40×10 band centered vertically.
        draw_signature(&mut canvas, &layer, &solid(80, 20, [0, 0, 0, 255]), 1.0);
        assert_eq!(canvas.get_pixel(50, 50).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(50, 32).0, WHITE);
        assert_eq!(canvas.get_pixel(50, 67).0, WHITE);
    }

    #[test]
    fn test_signature_colorize_recolors_ink() {
        let mut canvas = blank(100, 100);
        let mut layer = Layer::new(50.0, 50.0, 40.0, 40.0);
        layer.colorize = true;
        layer.colorize_color = Color::rgb(0, 0, 139);
        // Brightness would wash the ink out if it were applied.
        layer.set_adjust(200.0, 100.0);
        draw_signature(&mut canvas, &layer, &solid(20, 20, [0, 0, 0, 255]), 1.0);
        assert_eq!(canvas.get_pixel(50, 50).0, [0, 0, 139, 255]);
    }

    #[test]
    fn test_signature_white_paper_disappears_when_colorized() {
        let mut canvas = RgbaImage::from_pixel(50, 50, Rgba([10, 20, 30, 255]));
        let mut layer = Layer::new(50.0, 50.0, 60.0, 60.0);
        layer.colorize = true;
        layer.colorize_color = Color::rgb(255, 0, 0);
        draw_signature(&mut canvas, &layer, &solid(10, 10, WHITE), 1.0);
        assert_eq!(canvas.get_pixel(25, 25).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_oversized_layer_effects_are_bounded() {
        let mut canvas = blank(100, 100);
        let mut layer = Layer::new(50.0, 50.0, 40.0, 40.0);
        layer.shadow = Shadow {
            blur: 1e7,
            color: Color::BLACK,
        };
        layer.stroke = Stroke {
            width: 1e7,
            color: Color::rgb(0, 0, 255),
        };
        draw_photo(&mut canvas, &layer, &solid(4, 4, [0, 255, 0, 255]), 2.0);
        // A 100px outline centered on the rectangle edge covers the canvas
        // around the photo.
        assert_eq!(canvas.get_pixel(2, 2).0, [0, 0, 255, 255]);
        assert_eq!(canvas.get_pixel(50, 50).0, [0, 255, 0, 255]);

        let mut canvas = blank(100, 100);
        let mut sig = Layer::new(50.0, 50.0, 40.0, 40.0);
        sig.shadow.blur = f64::NAN;
        sig.stroke.width = f64::INFINITY;
        draw_signature(&mut canvas, &sig, &solid(20, 20, [0, 0, 0, 255]), 2.0);
        assert_eq!(canvas.get_pixel(50, 50).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(2, 2).0, WHITE);
    }
}
