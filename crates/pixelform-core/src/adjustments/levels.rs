//! Levels adjustment: per-channel input range, gamma, and output range.

use super::store_channel;
use crate::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Remap parameters for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelsChannel {
    pub input_black: f64,
    pub input_white: f64,
    pub gamma: f64,
    pub output_black: f64,
    pub output_white: f64,
}

impl Default for LevelsChannel {
    fn default() -> Self {
        Self {
            input_black: 0.0,
            input_white: 255.0,
            gamma: 1.0,
            output_black: 0.0,
            output_white: 255.0,
        }
    }
}

/// Levels adjustment. The master channel composes with the per-channel
/// passes rather than replacing them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelsAdjustment {
    pub enabled: bool,
    pub master: LevelsChannel,
    pub red: LevelsChannel,
    pub green: LevelsChannel,
    pub blue: LevelsChannel,
}

/// Remap a single channel value through one levels channel.
///
/// The value is clamped to [input_black, input_white], remapped linearly to
/// [0, 255], passed through gamma as `255 * (v/255)^(1/gamma)`, then
/// remapped linearly into [output_black, output_white].
pub fn level_value(value: f64, channel: &LevelsChannel) -> f64 {
    let clamped = value.clamp(channel.input_black, channel.input_white);

    let input_range = channel.input_white - channel.input_black;
    let mut v = if input_range.abs() < f64::EPSILON {
        0.0
    } else {
        (clamped - channel.input_black) / input_range * 255.0
    };

    if channel.gamma > 0.0 && (channel.gamma - 1.0).abs() > f64::EPSILON {
        v = 255.0 * (v / 255.0).powf(1.0 / channel.gamma);
    }

    channel.output_black + v / 255.0 * (channel.output_white - channel.output_black)
}

/// Apply a levels adjustment, master channel first, then per-channel.
/// Disabled parameters return the buffer unchanged.
pub fn apply_levels(buffer: &PixelBuffer, adjustment: &LevelsAdjustment) -> PixelBuffer {
    if !adjustment.enabled {
        return buffer.clone();
    }

    let mut result = buffer.clone();
    for px in result.pixels.chunks_exact_mut(4) {
        let r = level_value(px[0] as f64, &adjustment.master);
        let g = level_value(px[1] as f64, &adjustment.master);
        let b = level_value(px[2] as f64, &adjustment.master);

        px[0] = store_channel(level_value(r, &adjustment.red));
        px[1] = store_channel(level_value(g, &adjustment.green));
        px[2] = store_channel(level_value(b, &adjustment.blue));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_master(channel: LevelsChannel) -> LevelsAdjustment {
        LevelsAdjustment {
            enabled: true,
            master: channel,
            ..LevelsAdjustment::default()
        }
    }

    #[test]
    fn test_identity_channel_maps_every_value_to_itself() {
        let identity = LevelsChannel::default();
        for v in 0..=255u32 {
            let out = level_value(v as f64, &identity);
            assert!(
                (out - v as f64).abs() < 1e-9,
                "identity levels changed {} to {}",
                v,
                out
            );
        }
    }

    #[test]
    fn test_disabled_is_identity() {
        let buf = PixelBuffer::filled(2, 2, [12, 34, 56, 78]);
        let adj = LevelsAdjustment {
            enabled: false,
            master: LevelsChannel {
                input_black: 100.0,
                ..LevelsChannel::default()
            },
            ..LevelsAdjustment::default()
        };
        assert_eq!(apply_levels(&buf, &adj), buf);
    }

    #[test]
    fn test_input_range_remap_endpoints() {
        let channel = LevelsChannel {
            input_black: 50.0,
            input_white: 200.0,
            ..LevelsChannel::default()
        };
        assert_eq!(level_value(50.0, &channel), 0.0);
        assert_eq!(level_value(200.0, &channel), 255.0);
        // Below/above the input range clamps to the endpoints.
        assert_eq!(level_value(0.0, &channel), 0.0);
        assert_eq!(level_value(255.0, &channel), 255.0);
        // Midpoint of the input range remaps linearly to mid output.
        assert!((level_value(125.0, &channel) - 127.5).abs() < 1e-9);
    }

    #[test]
    fn test_gamma_brightens_midtones() {
        let channel = LevelsChannel {
            gamma: 2.0,
            ..LevelsChannel::default()
        };
        let out = level_value(64.0, &channel);
        assert!(out > 64.0, "gamma > 1 should lift midtones, got {}", out);
        // Endpoints are fixed under gamma.
        assert!(level_value(0.0, &channel).abs() < 1e-9);
        assert!((level_value(255.0, &channel) - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_range_compresses() {
        let channel = LevelsChannel {
            output_black: 64.0,
            output_white: 192.0,
            ..LevelsChannel::default()
        };
        assert_eq!(level_value(0.0, &channel), 64.0);
        assert_eq!(level_value(255.0, &channel), 192.0);
    }

    #[test]
    fn test_master_composes_with_per_channel() {
        // Master maps everything through a 50-200 window; the red channel
        // then inverts its output range. Both must apply, in that order.
        let adj = LevelsAdjustment {
            enabled: true,
            master: LevelsChannel {
                input_black: 50.0,
                input_white: 200.0,
                ..LevelsChannel::default()
            },
            red: LevelsChannel {
                output_black: 255.0,
                output_white: 0.0,
                ..LevelsChannel::default()
            },
            ..LevelsAdjustment::default()
        };

        let buf = PixelBuffer::filled(1, 1, [200, 200, 200, 255]);
        let out = apply_levels(&buf, &adj);
        // Master: 200 -> 255. Red inverts: 255 -> 0. Green/blue stay at 255.
        assert_eq!(out.rgba(0, 0), [0, 255, 255, 255]);
    }

    #[test]
    fn test_alpha_passes_through() {
        let adj = enabled_master(LevelsChannel {
            input_black: 50.0,
            ..LevelsChannel::default()
        });
        let buf = PixelBuffer::filled(1, 1, [10, 20, 30, 99]);
        assert_eq!(apply_levels(&buf, &adj).rgba(0, 0)[3], 99);
    }

    #[test]
    fn test_degenerate_input_range() {
        let channel = LevelsChannel {
            input_black: 128.0,
            input_white: 128.0,
            ..LevelsChannel::default()
        };
        // Zero-width input range falls back to output black.
        assert_eq!(level_value(128.0, &channel), 0.0);
    }
}
