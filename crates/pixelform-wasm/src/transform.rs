//! WASM bindings for the perspective warp.
//!
//! Corner sets cross the boundary as plain objects with `top_left`,
//! `top_right`, `bottom_left` and `bottom_right` points.

use crate::types::JsPixelBuffer;
use pixelform_core::transform::{
    apply_perspective_transform, constrain_perspective as core_constrain,
    hit_test_corner as core_hit_test, is_valid_perspective as core_is_valid, Interpolation,
    PerspectiveCorners,
};
use wasm_bindgen::prelude::*;

fn parse_corners(value: JsValue, what: &str) -> Result<PerspectiveCorners, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {} corners: {}", what, e)))
}

/// Warp an image so the source quadrilateral lands on the destination
/// quadrilateral.
///
/// Pass `0` for `output_width`/`output_height` to size the canvas from the
/// destination corners' bounding box.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const warped = apply_perspective(image, srcCorners, dstCorners, 0, 0, false);
/// ```
#[wasm_bindgen]
pub fn apply_perspective(
    image: &JsPixelBuffer,
    src_corners: JsValue,
    dst_corners: JsValue,
    output_width: u32,
    output_height: u32,
    use_nearest: bool,
) -> Result<JsPixelBuffer, JsValue> {
    let src = parse_corners(src_corners, "source")?;
    let dst = parse_corners(dst_corners, "destination")?;
    let interpolation = if use_nearest {
        Interpolation::Nearest
    } else {
        Interpolation::Bilinear
    };

    let result = apply_perspective_transform(
        &image.to_buffer(),
        &src,
        &dst,
        (output_width > 0).then_some(output_width),
        (output_height > 0).then_some(output_height),
        interpolation,
    );
    Ok(JsPixelBuffer::from_buffer(result))
}

/// True when the corner set forms a convex, non-self-intersecting quad.
#[wasm_bindgen]
pub fn is_valid_perspective(corners: JsValue) -> Result<bool, JsValue> {
    Ok(core_is_valid(&parse_corners(corners, "perspective")?))
}

/// Pull runaway corners back within the skew limit, returning the adjusted
/// corner set.
#[wasm_bindgen]
pub fn constrain_perspective(corners: JsValue, max_skew: f64) -> Result<JsValue, JsValue> {
    let constrained = core_constrain(&parse_corners(corners, "perspective")?, max_skew);
    serde_wasm_bindgen::to_value(&constrained).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Name of the corner handle within `threshold` pixels of (x, y)
/// ("top-left", ...), or undefined.
#[wasm_bindgen]
pub fn hit_test_corner(
    x: f64,
    y: f64,
    corners: JsValue,
    threshold: f64,
) -> Result<JsValue, JsValue> {
    let corners = parse_corners(corners, "perspective")?;
    match core_hit_test(x, y, &corners, threshold) {
        Some(handle) => {
            serde_wasm_bindgen::to_value(&handle).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        None => Ok(JsValue::UNDEFINED),
    }
}
