//! Color balance: tone-weighted channel shifts for shadows, midtones, and
//! highlights.

use super::store_channel;
use crate::luminance::luminance;
use crate::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Channel shifts for one tonal range, each in [-100, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorBalanceValues {
    pub cyan_red: f64,
    pub magenta_green: f64,
    pub yellow_blue: f64,
}

/// Color balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorBalanceAdjustment {
    pub enabled: bool,
    pub shadows: ColorBalanceValues,
    pub midtones: ColorBalanceValues,
    pub highlights: ColorBalanceValues,
    pub preserve_luminosity: bool,
}

impl Default for ColorBalanceAdjustment {
    fn default() -> Self {
        Self {
            enabled: false,
            shadows: ColorBalanceValues::default(),
            midtones: ColorBalanceValues::default(),
            highlights: ColorBalanceValues::default(),
            preserve_luminosity: true,
        }
    }
}

/// Apply color balance. Disabled parameters return the buffer unchanged.
///
/// Tonal weights are derived from luminance: shadows fade out linearly by
/// L = 128, highlights fade in from there, and midtones take the remainder.
/// The construction is reproduced verbatim; the weights are not re-clamped
/// to sum to one beyond it.
pub fn apply_color_balance(
    buffer: &PixelBuffer,
    adjustment: &ColorBalanceAdjustment,
) -> PixelBuffer {
    if !adjustment.enabled {
        return buffer.clone();
    }

    let mut result = buffer.clone();
    for px in result.pixels.chunks_exact_mut(4) {
        let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
        let lum = luminance(px[0], px[1], px[2]);

        let shadow_weight = (1.0 - lum / 128.0).max(0.0);
        let highlight_weight = ((lum - 128.0) / 127.0).max(0.0);
        let midtone_weight = 1.0 - shadow_weight - highlight_weight;

        let blend = |shadows: f64, midtones: f64, highlights: f64| {
            shadows * shadow_weight + midtones * midtone_weight + highlights * highlight_weight
        };

        let mut new_r = (r + blend(
            adjustment.shadows.cyan_red,
            adjustment.midtones.cyan_red,
            adjustment.highlights.cyan_red,
        ))
        .clamp(0.0, 255.0);
        let mut new_g = (g + blend(
            adjustment.shadows.magenta_green,
            adjustment.midtones.magenta_green,
            adjustment.highlights.magenta_green,
        ))
        .clamp(0.0, 255.0);
        let mut new_b = (b + blend(
            adjustment.shadows.yellow_blue,
            adjustment.midtones.yellow_blue,
            adjustment.highlights.yellow_blue,
        ))
        .clamp(0.0, 255.0);

        if adjustment.preserve_luminosity {
            let new_lum = crate::luminance::luminance_f64(new_r, new_g, new_b);
            if new_lum != 0.0 {
                let scale = lum / new_lum;
                new_r = (new_r * scale).clamp(0.0, 255.0);
                new_g = (new_g * scale).clamp(0.0, 255.0);
                new_b = (new_b * scale).clamp(0.0, 255.0);
            }
        }

        px[0] = store_channel(new_r);
        px[1] = store_channel(new_g);
        px[2] = store_channel(new_b);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midtone_shift(cyan_red: f64) -> ColorBalanceAdjustment {
        ColorBalanceAdjustment {
            enabled: true,
            midtones: ColorBalanceValues {
                cyan_red,
                ..ColorBalanceValues::default()
            },
            preserve_luminosity: false,
            ..ColorBalanceAdjustment::default()
        }
    }

    #[test]
    fn test_disabled_is_identity() {
        let buf = PixelBuffer::filled(2, 2, [50, 100, 150, 255]);
        let adj = ColorBalanceAdjustment {
            enabled: false,
            ..midtone_shift(100.0)
        };
        assert_eq!(apply_color_balance(&buf, &adj), buf);
    }

    #[test]
    fn test_zero_values_are_identity() {
        let buf = PixelBuffer::filled(2, 2, [50, 100, 150, 255]);
        let adj = ColorBalanceAdjustment {
            enabled: true,
            preserve_luminosity: false,
            ..ColorBalanceAdjustment::default()
        };
        assert_eq!(apply_color_balance(&buf, &adj), buf);
    }

    #[test]
    fn test_midtone_red_shift_on_gray() {
        // Mid-gray sits fully in the midtone band.
        let buf = PixelBuffer::filled(1, 1, [128, 128, 128, 255]);
        let out = apply_color_balance(&buf, &midtone_shift(30.0));
        let [r, g, b, _] = out.rgba(0, 0);
        assert!(r > 128, "red should rise, got {}", r);
        assert_eq!(g, 128);
        assert_eq!(b, 128);
    }

    #[test]
    fn test_shadow_shift_spares_highlights() {
        let adj = ColorBalanceAdjustment {
            enabled: true,
            shadows: ColorBalanceValues {
                cyan_red: 60.0,
                ..ColorBalanceValues::default()
            },
            preserve_luminosity: false,
            ..ColorBalanceAdjustment::default()
        };

        let dark = apply_color_balance(&PixelBuffer::filled(1, 1, [20, 20, 20, 255]), &adj);
        assert!(dark.rgba(0, 0)[0] > 20 + 40, "shadows strongly shifted");

        let bright = apply_color_balance(&PixelBuffer::filled(1, 1, [230, 230, 230, 255]), &adj);
        assert_eq!(bright.rgba(0, 0)[0], 230, "highlights untouched");
    }

    #[test]
    fn test_preserve_luminosity_rescales() {
        let buf = PixelBuffer::filled(1, 1, [128, 128, 128, 255]);
        let mut adj = midtone_shift(80.0);
        adj.preserve_luminosity = true;
        let out = apply_color_balance(&buf, &adj);
        let [r, g, b, _] = out.rgba(0, 0);

        let lum_after = luminance(r, g, b);
        assert!(
            (lum_after - 128.0).abs() <= 1.0,
            "luminance should be preserved, got {}",
            lum_after
        );
        assert!(r > g, "the hue shift itself must survive the rescale");
    }

    #[test]
    fn test_preserve_luminosity_skips_black() {
        // Shifting black with negative values keeps new luminance at 0;
        // the rescale must be skipped, not divide by zero.
        let buf = PixelBuffer::filled(1, 1, [0, 0, 0, 255]);
        let mut adj = midtone_shift(-100.0);
        adj.shadows.cyan_red = -100.0;
        adj.preserve_luminosity = true;
        let out = apply_color_balance(&buf, &adj);
        assert_eq!(out.rgba(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_passes_through() {
        let buf = PixelBuffer::filled(1, 1, [128, 128, 128, 42]);
        let out = apply_color_balance(&buf, &midtone_shift(50.0));
        assert_eq!(out.rgba(0, 0)[3], 42);
    }
}
