//! Pixelform WASM - WebAssembly bindings for Pixelform
//!
//! This crate exposes the pixelform-core raster editing engines to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for pixel data
//! - `adjustments` - Tonal and color adjustments (levels, curves, ...)
//! - `selection` - Selection session (interactive tools, magic wand)
//! - `mask` - Layer mask compositing
//! - `transform` - Perspective warp
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPixelBuffer, apply_levels } from '@pixelform/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const image = new JsPixelBuffer(width, height, imageData.data);
//! const result = apply_levels(image, levelsParams);
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod mask;
mod selection;
mod transform;
mod types;

// Re-export public types
pub use adjustments::{
    apply_black_white, apply_color_balance, apply_curves, apply_gradient_map, apply_levels,
    apply_posterize, apply_threshold,
};
pub use mask::{apply_mask, invert_mask};
pub use selection::SelectionEngine;
pub use transform::{apply_perspective, constrain_perspective, hit_test_corner, is_valid_perspective};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str(concat!(
        "pixelform-wasm ",
        env!("CARGO_PKG_VERSION"),
        " ready"
    )));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
