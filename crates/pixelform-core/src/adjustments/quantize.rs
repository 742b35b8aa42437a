//! Threshold and posterize adjustments.

use super::store_channel;
use crate::luminance::luminance;
use crate::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Threshold adjustment. Pixels at or above the level become white,
/// everything else black, judged on luminance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdAdjustment {
    pub enabled: bool,
    /// Cut level in the 0-255 luminance range.
    pub level: f64,
}

impl Default for ThresholdAdjustment {
    fn default() -> Self {
        Self {
            enabled: false,
            level: 128.0,
        }
    }
}

/// Posterize adjustment reducing each channel to a fixed number of levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosterizeAdjustment {
    pub enabled: bool,
    /// Number of output levels per channel, 2 or more.
    pub levels: u32,
}

impl Default for PosterizeAdjustment {
    fn default() -> Self {
        Self {
            enabled: false,
            levels: 4,
        }
    }
}

/// Apply the threshold cut. Alpha passes through untouched.
pub fn apply_threshold(buffer: &PixelBuffer, adjustment: &ThresholdAdjustment) -> PixelBuffer {
    if !adjustment.enabled {
        return buffer.clone();
    }

    let mut result = buffer.clone();
    for px in result.pixels.chunks_exact_mut(4) {
        let v = if luminance(px[0], px[1], px[2]) >= adjustment.level {
            255
        } else {
            0
        };
        px[0] = v;
        px[1] = v;
        px[2] = v;
    }
    result
}

/// Snap a channel value to the nearest posterize step.
#[inline]
fn posterize_value(value: f64, step: f64) -> f64 {
    ((value / step).round() * step).round()
}

/// Apply posterization. Fewer than two levels leaves the buffer unchanged.
pub fn apply_posterize(buffer: &PixelBuffer, adjustment: &PosterizeAdjustment) -> PixelBuffer {
    if !adjustment.enabled || adjustment.levels < 2 {
        return buffer.clone();
    }

    let step = 255.0 / (adjustment.levels - 1) as f64;
    let mut result = buffer.clone();
    for px in result.pixels.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            *c = store_channel(posterize_value(*c as f64, step));
        }
    }
    result
}
