//! Curves adjustment: tone remapping through user-placed knots.
//!
//! Between two knots the curve uses Catmull-Rom interpolation when a full
//! 4-point neighborhood exists (at least 4 knots, with a knot on each side
//! of the segment), and linear interpolation otherwise. Outside the first
//! and last knot the output clamps to that endpoint.

use super::store_channel;
use crate::PixelBuffer;
use serde::{Deserialize, Serialize};

/// One curve knot; input and output are both in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub input: f64,
    pub output: f64,
}

impl CurvePoint {
    pub fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Knots for one channel, kept sorted by input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvesChannel {
    pub points: Vec<CurvePoint>,
}

impl Default for CurvesChannel {
    fn default() -> Self {
        // Identity line.
        Self {
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(255.0, 255.0)],
        }
    }
}

/// Curves adjustment. The master channel composes with the per-channel
/// passes, like levels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurvesAdjustment {
    pub enabled: bool,
    pub master: CurvesChannel,
    pub red: CurvesChannel,
    pub green: CurvesChannel,
    pub blue: CurvesChannel,
}

/// Evaluate the curve at `value`. `points` must be sorted by input.
///
/// Fewer than two points fall back to passthrough (zero points) or the
/// single point's output.
pub fn interpolate_curve(value: f64, points: &[CurvePoint]) -> f64 {
    match points.len() {
        0 => return value,
        1 => return points[0].output,
        _ => {}
    }

    let n = points.len();
    if value <= points[0].input {
        return points[0].output;
    }
    if value >= points[n - 1].input {
        return points[n - 1].output;
    }

    // Find the segment [i, i+1] containing value.
    let mut i = 0;
    while i + 2 < n && points[i + 1].input <= value {
        i += 1;
    }

    let p1 = points[i];
    let p2 = points[i + 1];
    let span = p2.input - p1.input;
    if span.abs() < f64::EPSILON {
        return p1.output;
    }
    let t = (value - p1.input) / span;

    // Catmull-Rom needs a knot on each side of the segment.
    if n >= 4 && i >= 1 && i + 2 < n {
        let p0 = points[i - 1].output;
        let p3 = points[i + 2].output;
        let (y1, y2) = (p1.output, p2.output);
        let t2 = t * t;
        let t3 = t2 * t;
        0.5 * ((2.0 * y1)
            + (-p0 + y2) * t
            + (2.0 * p0 - 5.0 * y1 + 4.0 * y2 - p3) * t2
            + (-p0 + 3.0 * y1 - 3.0 * y2 + p3) * t3)
    } else {
        p1.output + (p2.output - p1.output) * t
    }
}

/// Build a 256-entry lookup table for the master-then-channel composition.
/// The composition stays in floating point; quantization happens once at
/// the end.
fn build_lut(master: &[CurvePoint], channel: &[CurvePoint]) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let after_master = interpolate_curve(i as f64, master);
        *slot = store_channel(interpolate_curve(after_master, channel));
    }
    lut
}

/// Apply a curves adjustment, master channel first, then per-channel.
/// Disabled parameters return the buffer unchanged.
pub fn apply_curves(buffer: &PixelBuffer, adjustment: &CurvesAdjustment) -> PixelBuffer {
    if !adjustment.enabled {
        return buffer.clone();
    }

    let mut sorted = adjustment.clone();
    for channel in [
        &mut sorted.master,
        &mut sorted.red,
        &mut sorted.green,
        &mut sorted.blue,
    ] {
        channel
            .points
            .sort_by(|a, b| a.input.partial_cmp(&b.input).unwrap_or(std::cmp::Ordering::Equal));
    }

    let lut_r = build_lut(&sorted.master.points, &sorted.red.points);
    let lut_g = build_lut(&sorted.master.points, &sorted.green.points);
    let lut_b = build_lut(&sorted.master.points, &sorted.blue.points);

    let mut result = buffer.clone();
    for px in result.pixels.chunks_exact_mut(4) {
        px[0] = lut_r[px[0] as usize];
        px[1] = lut_g[px[1] as usize];
        px[2] = lut_b[px[2] as usize];
    }
    result
}
