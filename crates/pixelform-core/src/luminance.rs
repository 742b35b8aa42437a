//! Luminance calculation utilities using ITU-R BT.601 coefficients.
//!
//! The whole tonal pipeline (color balance weighting, black-and-white
//! conversion, threshold, gradient-map lookup) is specified on the
//! 0.299/0.587/0.114 approximation, so it lives here once.

/// ITU-R BT.601 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f64 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f64 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f64 = 0.114;

/// Calculate luminance from 8-bit RGB values, in the 0.0-255.0 range.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    LUMINANCE_R * r as f64 + LUMINANCE_G * g as f64 + LUMINANCE_B * b as f64
}

/// Calculate luminance from float channel values (same scale as the inputs).
#[inline]
pub fn luminance_f64(r: f64, g: f64, b: f64) -> f64 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-9, "Coefficients should sum to 1.0");
    }

    #[test]
    fn test_luminance_pure_white() {
        assert!((luminance(255, 255, 255) - 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_luminance_pure_black() {
        assert!(luminance(0, 0, 0).abs() < 1e-9);
    }

    #[test]
    fn test_green_dominates() {
        let g = luminance(0, 255, 0);
        let r = luminance(255, 0, 0);
        let b = luminance(0, 0, 255);
        assert!(g > r && r > b);
    }
}
