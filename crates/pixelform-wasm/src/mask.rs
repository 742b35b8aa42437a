//! WASM bindings for layer mask compositing.
//!
//! Mask pixel data crosses the boundary as a `JsPixelBuffer` (the grayscale
//! snapshot uses the red channel); mask parameters arrive as a plain object.

use crate::types::JsPixelBuffer;
use pixelform_core::mask::{apply_mask_to_pixels, invert_mask as core_invert_mask, MaskData};
use pixelform_core::LayerMask;
use wasm_bindgen::prelude::*;

fn mask_data_from_js(source: &JsPixelBuffer) -> MaskData {
    let buffer = source.to_buffer();
    MaskData {
        width: buffer.width,
        height: buffer.height,
        pixels: buffer.pixels,
    }
}

fn mask_data_to_js(mask: MaskData) -> JsPixelBuffer {
    JsPixelBuffer::new(mask.width, mask.height, mask.pixels)
}

/// Apply a layer mask to an image, multiplying source alpha by the mask's
/// red channel (inverted and density-scaled per `params`).
///
/// `params` carries the `LayerMask` fields (`enabled`, `invert`, `density`,
/// ...). A missing `mask_data`, a disabled mask, or mismatched dimensions
/// return the image unchanged.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const masked = apply_mask(image, { ...mask, data: null }, maskPixels);
/// ```
#[wasm_bindgen]
pub fn apply_mask(
    image: &JsPixelBuffer,
    params: JsValue,
    mask_data: Option<JsPixelBuffer>,
) -> Result<JsPixelBuffer, JsValue> {
    let mask: LayerMask = serde_wasm_bindgen::from_value(params)
        .map_err(|e| JsValue::from_str(&format!("Invalid mask parameters: {}", e)))?;
    let data = mask_data.as_ref().map(mask_data_from_js);
    Ok(JsPixelBuffer::from_buffer(apply_mask_to_pixels(
        &image.to_buffer(),
        &mask,
        data.as_ref(),
    )))
}

/// Invert a mask snapshot: flips R, G and B, leaving alpha untouched.
#[wasm_bindgen]
pub fn invert_mask(mask: &JsPixelBuffer) -> JsPixelBuffer {
    let mut data = mask_data_from_js(mask);
    core_invert_mask(&mut data);
    mask_data_to_js(data)
}
