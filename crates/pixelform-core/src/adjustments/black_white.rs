//! Black & white conversion with per-hue-band weights and optional tint.

use super::store_channel;
use crate::luminance::luminance;
use crate::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Black & white adjustment. Band weights are percentages; each hue band is
/// 60 degrees wide, with reds spanning 330-30.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlackWhiteAdjustment {
    pub enabled: bool,
    pub reds: f64,
    pub yellows: f64,
    pub greens: f64,
    pub cyans: f64,
    pub blues: f64,
    pub magentas: f64,
    pub tint_enabled: bool,
    /// Tint hue in degrees (0-360).
    pub tint_hue: f64,
    /// Tint saturation percentage (0-100).
    pub tint_saturation: f64,
}

impl Default for BlackWhiteAdjustment {
    fn default() -> Self {
        Self {
            enabled: false,
            reds: 40.0,
            yellows: 60.0,
            greens: 40.0,
            cyans: 60.0,
            blues: 20.0,
            magentas: 80.0,
            tint_enabled: false,
            tint_hue: 35.0,
            tint_saturation: 25.0,
        }
    }
}

/// Hue in degrees [0, 360) via the standard 60-degree-sector formula.
/// Achromatic pixels report hue 0.
fn hue_degrees(r: f64, g: f64, b: f64) -> f64 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta <= 0.0 {
        return 0.0;
    }

    let h = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    h.rem_euclid(360.0)
}

impl BlackWhiteAdjustment {
    /// Band weight for a hue, scaled to a unit factor.
    fn band_weight(&self, hue: f64) -> f64 {
        let band = if !(30.0..330.0).contains(&hue) {
            self.reds
        } else if hue < 90.0 {
            self.yellows
        } else if hue < 150.0 {
            self.greens
        } else if hue < 210.0 {
            self.cyans
        } else if hue < 270.0 {
            self.blues
        } else {
            self.magentas
        };
        band / 100.0
    }
}

/// Convert HSL to RGB (h in degrees, s and l in [0, 1]), 0-255 output scale.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    ((r1 + m) * 255.0, (g1 + m) * 255.0, (b1 + m) * 255.0)
}

/// Apply black & white conversion. Disabled parameters return the buffer
/// unchanged.
pub fn apply_black_white(buffer: &PixelBuffer, adjustment: &BlackWhiteAdjustment) -> PixelBuffer {
    if !adjustment.enabled {
        return buffer.clone();
    }

    let mut result = buffer.clone();
    for px in result.pixels.chunks_exact_mut(4) {
        let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
        let hue = hue_degrees(r, g, b);
        let weight = adjustment.band_weight(hue);
        let gray = (luminance(px[0], px[1], px[2]) * (1.0 + weight * 0.5)).clamp(0.0, 255.0);

        if adjustment.tint_enabled {
            let (tr, tg, tb) = hsl_to_rgb(
                adjustment.tint_hue,
                (adjustment.tint_saturation / 100.0).clamp(0.0, 1.0),
                gray / 255.0,
            );
            px[0] = store_channel(tr);
            px[1] = store_channel(tg);
            px[2] = store_channel(tb);
        } else {
            let v = store_channel(gray);
            px[0] = v;
            px[1] = v;
            px[2] = v;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> BlackWhiteAdjustment {
        BlackWhiteAdjustment {
            enabled: true,
            ..BlackWhiteAdjustment::default()
        }
    }

    #[test]
    fn test_default_parameters() {
        let adj = BlackWhiteAdjustment::default();
        assert!(!adj.enabled);
        assert_eq!(
            (adj.reds, adj.yellows, adj.greens, adj.cyans, adj.blues, adj.magentas),
            (40.0, 60.0, 40.0, 60.0, 20.0, 80.0)
        );
        assert!(!adj.tint_enabled);
        assert_eq!((adj.tint_hue, adj.tint_saturation), (35.0, 25.0));
    }

    #[test]
    fn test_disabled_is_identity() {
        let buf = PixelBuffer::filled(2, 2, [200, 30, 90, 255]);
        assert_eq!(apply_black_white(&buf, &BlackWhiteAdjustment::default()), buf);
    }

    #[test]
    fn test_output_is_grayscale() {
        let buf = PixelBuffer::filled(1, 1, [200, 30, 90, 201]);
        let out = apply_black_white(&buf, &enabled());
        let [r, g, b, a] = out.rgba(0, 0);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 201);
    }

    #[test]
    fn test_hue_sectors() {
        assert_eq!(hue_degrees(255.0, 0.0, 0.0), 0.0);
        assert_eq!(hue_degrees(255.0, 255.0, 0.0), 60.0);
        assert_eq!(hue_degrees(0.0, 255.0, 0.0), 120.0);
        assert_eq!(hue_degrees(0.0, 255.0, 255.0), 180.0);
        assert_eq!(hue_degrees(0.0, 0.0, 255.0), 240.0);
        assert_eq!(hue_degrees(255.0, 0.0, 255.0), 300.0);
        assert_eq!(hue_degrees(128.0, 128.0, 128.0), 0.0, "achromatic");
    }

    #[test]
    fn test_band_weight_drives_gray_level() {
        // Same luminance, different band weights: magentas (80) should come
        // out brighter than blues (20) under the defaults.
        let blue = PixelBuffer::filled(1, 1, [0, 0, 200, 255]);
        let magenta = PixelBuffer::filled(1, 1, [170, 0, 170, 255]);

        let blue_gray = apply_black_white(&blue, &enabled()).rgba(0, 0)[0] as f64;
        let magenta_gray = apply_black_white(&magenta, &enabled()).rgba(0, 0)[0] as f64;

        let blue_lum = luminance(0, 0, 200);
        let magenta_lum = luminance(170, 0, 170);
        assert!(
            magenta_gray / magenta_lum > blue_gray / blue_lum,
            "magenta band boost should exceed blue band boost"
        );
    }

    #[test]
    fn test_red_band_wraps_around_zero() {
        let adj = BlackWhiteAdjustment {
            reds: 100.0,
            ..enabled()
        };
        // Hue 350 lies in the reds band even though it is numerically large.
        assert!((adj.band_weight(350.0) - 1.0).abs() < 1e-9);
        assert!((adj.band_weight(10.0) - 1.0).abs() < 1e-9);
        assert!((adj.band_weight(60.0) - 0.6).abs() < 1e-9, "yellows band");
    }

    #[test]
    fn test_tint_applies_hue() {
        let adj = BlackWhiteAdjustment {
            tint_enabled: true,
            tint_hue: 42.0,
            tint_saturation: 50.0,
            ..enabled()
        };
        let buf = PixelBuffer::filled(1, 1, [128, 128, 128, 255]);
        let [r, g, b, _] = apply_black_white(&buf, &adj).rgba(0, 0);
        // Warm sepia-ish tint: red above blue.
        assert!(r > b, "tint hue 42 should skew warm: r={} b={}", r, b);
        assert!(g > b && g < r);
    }

    #[test]
    fn test_hsl_round_values() {
        let (r, g, b) = hsl_to_rgb(0.0, 1.0, 0.5);
        assert_eq!((r as u8, g as u8, b as u8), (255, 0, 0));
        let (r, g, b) = hsl_to_rgb(120.0, 1.0, 0.5);
        assert_eq!((r as u8, g as u8, b as u8), (0, 255, 0));
        let (r, g, b) = hsl_to_rgb(0.0, 0.0, 0.5);
        assert_eq!(r as u8, g as u8);
        assert_eq!(g as u8, b as u8);
    }

    #[test]
    fn test_white_stays_white() {
        let buf = PixelBuffer::filled(1, 1, [255, 255, 255, 255]);
        let out = apply_black_white(&buf, &enabled());
        assert_eq!(out.rgba(0, 0), [255, 255, 255, 255]);
    }
}
