//! Parametric tonal and color adjustments.
//!
//! Every adjustment is a pure function `(buffer, params) -> buffer` that
//! returns the input unchanged when the parameter struct is disabled. All
//! arithmetic runs in floating point; each output channel is clamped to
//! [0, 255] and rounded on store, and alpha always passes through untouched.
//! Each pass allocates exactly one output buffer of the input's dimensions.
//!
//! ## Adjustments
//! - Levels (per-channel black/white points, gamma, output range)
//! - Curves (knot interpolation, Catmull-Rom or linear)
//! - Color balance (shadow/midtone/highlight channel shifts)
//! - Black & white (hue-banded grayscale with optional tint)
//! - Threshold / Posterize (quantization)
//! - Gradient map (luminance-indexed gradient lookup)

pub mod black_white;
pub mod color_balance;
pub mod curves;
pub mod gradient_map;
pub mod levels;
pub mod quantize;

pub use black_white::{apply_black_white, BlackWhiteAdjustment};
pub use color_balance::{apply_color_balance, ColorBalanceAdjustment, ColorBalanceValues};
pub use curves::{apply_curves, interpolate_curve, CurvePoint, CurvesAdjustment, CurvesChannel};
pub use gradient_map::{apply_gradient_map, GradientMapAdjustment, GradientMapStop};
pub use levels::{apply_levels, LevelsAdjustment, LevelsChannel};
pub use quantize::{apply_posterize, apply_threshold, PosterizeAdjustment, ThresholdAdjustment};

/// Clamp a float channel value to [0, 255] and round for storage.
#[inline]
pub(crate) fn store_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}
