//! Pixelform Core - Raster editing library
//!
//! This crate provides the pixel-level engines for the Pixelform editor:
//! the selection model and its boolean combinator, color-based segmentation
//! (magic wand), layer-mask compositing, the parametric tonal adjustment
//! pipeline, and the perspective warp transform.
//!
//! Everything operates on row-major RGBA8 buffers and is synchronous and
//! single-threaded. Editing operations never fail across this boundary:
//! degenerate inputs resolve to documented fallbacks (identity matrices,
//! unchanged selections, transparent pixels) rather than errors.

pub mod adjustments;
pub mod geometry;
pub mod luminance;
pub mod mask;
pub mod selection;
pub mod transform;

pub use geometry::{bounds_from_path, SelectionBounds};
pub use mask::{LayerMask, MaskData, MaskType, Rasterizer};
pub use selection::{combine_selections, Selection, SelectionMode, SelectionState, SelectionType};
pub use transform::{
    apply_perspective_transform, compute_perspective_matrix, invert_perspective_matrix,
    transform_point, Interpolation, PerspectiveCorners, PerspectiveMatrix,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for pixel buffer construction.
#[derive(Debug, Error)]
pub enum PixelBufferError {
    /// Pixel data length does not match width * height * 4.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Pixel buffer dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
}

/// A point in buffer pixel-space. Sub-pixel positions are permitted for
/// sampling and interactive edit operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An owned RGBA8 raster: `width * height` pixels, 4 bytes each, row-major.
///
/// Pipeline functions either mutate a buffer in place or return a freshly
/// allocated buffer of identical dimensions, never partial-size results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length is width * height * 4.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new buffer from existing pixel data, validating dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, PixelBufferError> {
        if width == 0 || height == 0 {
            return Err(PixelBufferError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(PixelBufferError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a fully transparent buffer of the given dimensions.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Byte offset of the pixel at (x, y).
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// RGBA of the pixel at (x, y). Coordinates must be in bounds.
    #[inline]
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Write the RGBA of the pixel at (x, y). Coordinates must be in bounds.
    #[inline]
    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Create a PixelBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}
