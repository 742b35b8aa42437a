//! Mask compositing: turning masks into per-pixel alpha multipliers.

use super::{LayerMask, MaskData, Rasterizer};
use crate::{PixelBuffer, Point};

/// Apply a layer mask to a pixel buffer, returning a new buffer.
///
/// RGB passes through untouched. The mask's red channel is the raw alpha
/// value; `invert` flips it, `density` scales it, and the source alpha is
/// multiplied by the result. This is a straight alpha-multiply model with no
/// blend modes.
///
/// Fail-soft: a disabled mask, an absent mask source, or a dimension
/// mismatch all return the buffer unchanged.
pub fn apply_mask_to_pixels(
    buffer: &PixelBuffer,
    mask: &LayerMask,
    mask_data: Option<&MaskData>,
) -> PixelBuffer {
    let Some(data) = mask_data else {
        return buffer.clone();
    };
    if !mask.enabled || data.width != buffer.width || data.height != buffer.height {
        return buffer.clone();
    }

    let density = mask.density / 100.0;
    let mut result = buffer.clone();

    for (dst, src) in result
        .pixels
        .chunks_exact_mut(4)
        .zip(data.pixels.chunks_exact(4))
    {
        let mut mask_alpha = src[0] as f64;
        if mask.invert {
            mask_alpha = 255.0 - mask_alpha;
        }
        mask_alpha = (mask_alpha * density).round();

        dst[3] = ((dst[3] as f64 * mask_alpha) / 255.0).round().clamp(0.0, 255.0) as u8;
    }

    result
}

/// Rasterize a selection path into a mask, feathering if requested.
///
/// The path is filled white on black at the image's dimensions; a positive
/// `feather` then blurs the result by that radius before it is finalized.
pub fn create_mask_from_selection(
    rasterizer: &dyn Rasterizer,
    path: &[Point],
    width: u32,
    height: u32,
    feather: f64,
) -> MaskData {
    let mut mask = rasterizer.fill_path(path, width, height);
    if feather > 0.0 {
        rasterizer.blur(&mut mask, feather);
    }
    mask
}

/// Invert a mask in place, flipping R, G, and B identically and leaving
/// alpha untouched.
pub fn invert_mask(mask: &mut MaskData) {
    for px in mask.pixels.chunks_exact_mut(4) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}

/// Feather a mask in place by blurring it through the rasterization
/// collaborator. A non-positive radius is a no-op.
pub fn feather_mask(rasterizer: &dyn Rasterizer, mask: &mut MaskData, radius: f64) {
    if radius > 0.0 {
        rasterizer.blur(mask, radius);
    }
}
