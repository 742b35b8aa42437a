//! WASM bindings for the tonal adjustment pipeline.
//!
//! Each binding takes adjustment parameters as a plain JavaScript object
//! (deserialized with serde-wasm-bindgen) and returns a fresh buffer; the
//! source buffer is never mutated.

use crate::types::JsPixelBuffer;
use pixelform_core::adjustments::{
    apply_black_white as core_black_white, apply_color_balance as core_color_balance,
    apply_curves as core_curves, apply_gradient_map as core_gradient_map,
    apply_levels as core_levels, apply_posterize as core_posterize,
    apply_threshold as core_threshold, BlackWhiteAdjustment, ColorBalanceAdjustment,
    CurvesAdjustment, GradientMapAdjustment, LevelsAdjustment, PosterizeAdjustment,
    ThresholdAdjustment,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// Deserialize an adjustment parameter object, mapping failures to a JS
/// error string naming the adjustment.
fn parse_params<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {} parameters: {}", what, e)))
}

/// Apply a levels adjustment.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const result = apply_levels(image, {
///   enabled: true,
///   master: { input_black: 10, input_white: 245, gamma: 1.2,
///             output_black: 0, output_white: 255 },
///   red: defaultChannel, green: defaultChannel, blue: defaultChannel,
/// });
/// ```
#[wasm_bindgen]
pub fn apply_levels(image: &JsPixelBuffer, params: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let adjustment: LevelsAdjustment = parse_params(params, "levels")?;
    Ok(JsPixelBuffer::from_buffer(core_levels(
        &image.to_buffer(),
        &adjustment,
    )))
}

/// Apply a curves adjustment. Control points are `{ input, output }` pairs
/// in the 0-255 range; they do not need to arrive sorted.
#[wasm_bindgen]
pub fn apply_curves(image: &JsPixelBuffer, params: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let adjustment: CurvesAdjustment = parse_params(params, "curves")?;
    Ok(JsPixelBuffer::from_buffer(core_curves(
        &image.to_buffer(),
        &adjustment,
    )))
}

/// Apply a color balance adjustment.
#[wasm_bindgen]
pub fn apply_color_balance(
    image: &JsPixelBuffer,
    params: JsValue,
) -> Result<JsPixelBuffer, JsValue> {
    let adjustment: ColorBalanceAdjustment = parse_params(params, "color balance")?;
    Ok(JsPixelBuffer::from_buffer(core_color_balance(
        &image.to_buffer(),
        &adjustment,
    )))
}

/// Apply a black & white conversion.
#[wasm_bindgen]
pub fn apply_black_white(image: &JsPixelBuffer, params: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let adjustment: BlackWhiteAdjustment = parse_params(params, "black & white")?;
    Ok(JsPixelBuffer::from_buffer(core_black_white(
        &image.to_buffer(),
        &adjustment,
    )))
}

/// Apply a threshold adjustment.
#[wasm_bindgen]
pub fn apply_threshold(image: &JsPixelBuffer, params: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let adjustment: ThresholdAdjustment = parse_params(params, "threshold")?;
    Ok(JsPixelBuffer::from_buffer(core_threshold(
        &image.to_buffer(),
        &adjustment,
    )))
}

/// Apply a posterize adjustment.
#[wasm_bindgen]
pub fn apply_posterize(image: &JsPixelBuffer, params: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let adjustment: PosterizeAdjustment = parse_params(params, "posterize")?;
    Ok(JsPixelBuffer::from_buffer(core_posterize(
        &image.to_buffer(),
        &adjustment,
    )))
}

/// Apply a gradient map. Stops are `{ position, color: [r, g, b] }` objects.
#[wasm_bindgen]
pub fn apply_gradient_map(
    image: &JsPixelBuffer,
    params: JsValue,
) -> Result<JsPixelBuffer, JsValue> {
    let adjustment: GradientMapAdjustment = parse_params(params, "gradient map")?;
    Ok(JsPixelBuffer::from_buffer(core_gradient_map(
        &image.to_buffer(),
        &adjustment,
    )))
}

/// WASM-specific tests that require JsValue.
///
/// These exercise the parameter deserialization path and can only run on
/// wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn flat_image() -> JsPixelBuffer {
        JsPixelBuffer::new(2, 2, vec![128u8; 2 * 2 * 4])
    }

    #[wasm_bindgen_test]
    fn test_apply_levels_with_defaults() {
        let params = serde_wasm_bindgen::to_value(&LevelsAdjustment::default()).unwrap();
        let out = apply_levels(&flat_image(), params).unwrap();
        assert_eq!(out.pixels(), flat_image().pixels());
    }

    #[wasm_bindgen_test]
    fn test_apply_threshold_cuts() {
        let params = serde_wasm_bindgen::to_value(&ThresholdAdjustment {
            enabled: true,
            level: 100.0,
        })
        .unwrap();
        let out = apply_threshold(&flat_image(), params).unwrap();
        assert_eq!(out.pixels()[0], 255);
    }

    #[wasm_bindgen_test]
    fn test_invalid_params_are_rejected() {
        let params = serde_wasm_bindgen::to_value(&"not an object").unwrap();
        assert!(apply_posterize(&flat_image(), params).is_err());
    }
}
