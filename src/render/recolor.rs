//! Signature ink recolor.
//!
//! Dark, opaque source pixels become fully opaque target-color pixels; light
//! or transparent pixels fade out. Anti-aliased edges keep their partial
//! coverage, so the result has no light fringe around the strokes.

use image::RgbaImage;

use crate::model::Color;

/// Recolor an RGBA8 buffer (`width × height × 4` bytes) in place.
///
/// For each pixel, `strength = (1 − avg(R,G,B)/255) × (A/255)` and the output
/// is the target RGB with alpha `round(strength × 255)`. The target's own
/// alpha is ignored.
pub fn recolor_in_place(rgba: &mut [u8], target: Color) {
    for px in rgba.chunks_exact_mut(4) {
        let avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
        let strength = (1.0 - avg / 255.0) * (px[3] as f32 / 255.0);
        px[0] = target.r;
        px[1] = target.g;
        px[2] = target.b;
        px[3] = (strength * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

pub fn recolor_image(image: &mut RgbaImage, target: Color) {
    recolor_in_place(&mut **image, target);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recolor_one(px: [u8; 4], target: Color) -> [u8; 4] {
        let mut buf = px.to_vec();
        recolor_in_place(&mut buf, target);
        [buf[0], buf[1], buf[2], buf[3]]
    }

    #[test]
    fn test_opaque_black_is_full_strength() {
        assert_eq!(recolor_one([0, 0, 0, 255], Color::WHITE), [255, 255, 255, 255]);
        assert_eq!(
            recolor_one([0, 0, 0, 255], Color::rgb(0, 0, 139)),
            [0, 0, 139, 255]
        );
    }

    #[test]
    fn test_transparent_is_invisible() {
        for target in [Color::WHITE, Color::BLACK, Color::rgb(200, 10, 10)] {
            assert_eq!(recolor_one([0, 0, 0, 0], target)[3], 0);
            assert_eq!(recolor_one([255, 255, 255, 0], target)[3], 0);
        }
    }

    #[test]
    fn test_white_paper_drops_out() {
        assert_eq!(recolor_one([255, 255, 255, 255], Color::BLACK)[3], 0);
    }

    #[test]
    fn test_partial_strength() {
        // mid-gray at half alpha: (1 - 0.5) * 0.5 = 0.25
        let out = recolor_one([127, 128, 127, 128], Color::rgb(0, 0, 255));
        assert_eq!(&out[..3], &[0, 0, 255]);
        assert!((out[3] as i32 - 64).abs() <= 1);
    }

    #[test]
    fn test_target_alpha_ignored() {
        assert_eq!(
            recolor_one([0, 0, 0, 255], Color::rgba(10, 20, 30, 0)),
            [10, 20, 30, 255]
        );
    }

    #[test]
    fn test_buffer_length_not_multiple_of_four() {
        let mut buf = vec![0u8, 0, 0, 255, 9, 9];
        recolor_in_place(&mut buf, Color::WHITE);
        assert_eq!(buf, vec![255, 255, 255, 255, 9, 9]);
    }
}
