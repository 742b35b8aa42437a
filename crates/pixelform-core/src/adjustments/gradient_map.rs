//! Gradient map adjustment: remap luminance through a color gradient.

use super::store_channel;
use crate::luminance::luminance;
use crate::PixelBuffer;
use serde::{Deserialize, Serialize};

/// A single gradient stop. Position is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientMapStop {
    pub position: f64,
    pub color: [u8; 3],
}

/// Gradient map adjustment parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientMapAdjustment {
    pub enabled: bool,
    pub stops: Vec<GradientMapStop>,
    /// Mirror the gradient end for end.
    pub reverse: bool,
    /// Add ordered dithering to break up banding.
    pub dither: bool,
}

impl Default for GradientMapAdjustment {
    fn default() -> Self {
        Self {
            enabled: false,
            stops: vec![
                GradientMapStop {
                    position: 0.0,
                    color: [0, 0, 0],
                },
                GradientMapStop {
                    position: 1.0,
                    color: [255, 255, 255],
                },
            ],
            reverse: false,
            dither: false,
        }
    }
}

/// 4x4 Bayer ordered-dither matrix.
const BAYER_4X4: [[f64; 4]; 4] = [
    [0.0, 8.0, 2.0, 10.0],
    [12.0, 4.0, 14.0, 6.0],
    [3.0, 11.0, 1.0, 9.0],
    [15.0, 7.0, 13.0, 5.0],
];

/// Sample the gradient at position `t` in [0, 1]. Stops must be sorted by
/// position. Positions outside the outer stops clamp to the end colors.
fn sample_gradient(stops: &[GradientMapStop], t: f64) -> [f64; 3] {
    let first = stops[0];
    let last = stops[stops.len() - 1];
    if t <= first.position {
        return [
            first.color[0] as f64,
            first.color[1] as f64,
            first.color[2] as f64,
        ];
    }
    if t >= last.position {
        return [
            last.color[0] as f64,
            last.color[1] as f64,
            last.color[2] as f64,
        ];
    }

    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.position {
            let span = b.position - a.position;
            let f = if span > 0.0 { (t - a.position) / span } else { 0.0 };
            return [
                a.color[0] as f64 + (b.color[0] as f64 - a.color[0] as f64) * f,
                a.color[1] as f64 + (b.color[1] as f64 - a.color[1] as f64) * f,
                a.color[2] as f64 + (b.color[2] as f64 - a.color[2] as f64) * f,
            ];
        }
    }
    [
        last.color[0] as f64,
        last.color[1] as f64,
        last.color[2] as f64,
    ]
}

/// Apply the gradient map. Fewer than two stops returns the buffer
/// unchanged.
pub fn apply_gradient_map(buffer: &PixelBuffer, adjustment: &GradientMapAdjustment) -> PixelBuffer {
    if !adjustment.enabled || adjustment.stops.len() < 2 {
        return buffer.clone();
    }

    // Reversal mirrors the position sequence across the stop list without
    // reordering colors: stop i keeps its color and takes 1 - position of
    // its mirror. A symmetric stop layout reverses to itself.
    let mut stops: Vec<GradientMapStop> = if adjustment.reverse {
        let n = adjustment.stops.len();
        (0..n)
            .map(|i| GradientMapStop {
                position: 1.0 - adjustment.stops[i].position,
                color: adjustment.stops[n - 1 - i].color,
            })
            .collect()
    } else {
        adjustment.stops.clone()
    };
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut result = buffer.clone();
    let width = result.width as usize;
    for (i, px) in result.pixels.chunks_exact_mut(4).enumerate() {
        let mut t = luminance(px[0], px[1], px[2]) / 255.0;
        if adjustment.dither {
            let (x, y) = (i % width, i / width);
            t += (BAYER_4X4[y % 4][x % 4] / 16.0 - 0.5) / 255.0;
            t = t.clamp(0.0, 1.0);
        }
        let [r, g, b] = sample_gradient(&stops, t);
        px[0] = store_channel(r);
        px[1] = store_channel(g);
        px[2] = store_channel(b);
    }
    result
}
