//! Layer masks: per-pixel alpha multipliers attached to a layer.
//!
//! A mask is derived from a selection path or painted freehand. Masks follow
//! a single-channel-in-RGBA convention: R = G = B = the alpha-derived gray,
//! and the compositor reads the red channel. Rasterizing a vector path into
//! pixels (and blurring it for feathering) is an external capability reached
//! through the [`Rasterizer`] trait; this module never rasterizes paths
//! itself.

mod apply;

pub use apply::{apply_mask_to_pixels, create_mask_from_selection, feather_mask, invert_mask};

use crate::Point;
use serde::{Deserialize, Serialize};

/// Pixel or vector mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    #[default]
    Pixel,
    Vector,
}

/// A rasterized mask snapshot: RGBA8 gray where the red channel carries the
/// mask value. Replaces the opaque encoded blobs of older project files with
/// an explicit dimensions-plus-bytes record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskData {
    pub width: u32,
    pub height: u32,
    /// RGBA bytes, length width * height * 4.
    pub pixels: Vec<u8>,
}

impl MaskData {
    /// A fully black (hide-all) mask.
    pub fn black(width: u32, height: u32) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&[0, 0, 0, 255]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A fully white (reveal-all) mask.
    pub fn white(width: u32, height: u32) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&[255, 255, 255, 255]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Mask value (red channel) at (x, y). Coordinates must be in bounds.
    #[inline]
    pub fn value(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y as usize * self.width as usize + x as usize) * 4]
    }
}

/// External rasterization collaborator.
///
/// The host supplies polygon fill and blur; mask construction and feathering
/// are expressed against this seam so the core stays free of rendering and
/// image-encoding concerns.
pub trait Rasterizer {
    /// Fill the closed polygon `path` as white on a black canvas of the
    /// given dimensions.
    fn fill_path(&self, path: &[Point], width: u32, height: u32) -> MaskData;

    /// Blur the mask in place with the given radius, treating R, G, and B
    /// identically.
    fn blur(&self, mask: &mut MaskData, radius: f64);
}

/// A mask attached to a layer. At most one per layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerMask {
    pub id: u64,
    pub kind: MaskType,
    pub enabled: bool,
    /// Whether the mask moves with the layer content.
    pub linked: bool,
    /// Overall mask strength, 0-100.
    pub density: f64,
    /// Edge blur radius in pixels.
    pub feather: f64,
    pub invert: bool,
    /// The rasterized mask, if one has been produced.
    pub data: Option<MaskData>,
    /// Source polygon for vector masks.
    pub vector_path: Option<Vec<Point>>,
}

impl Default for LayerMask {
    fn default() -> Self {
        Self {
            id: 0,
            kind: MaskType::Pixel,
            enabled: true,
            linked: true,
            density: 100.0,
            feather: 0.0,
            invert: false,
            data: None,
            vector_path: None,
        }
    }
}

impl LayerMask {
    /// Create a mask for a layer, copying the active selection's path when
    /// one exists (none means a full reveal/hide mask).
    pub fn from_selection(id: u64, selection_path: Option<&[Point]>) -> Self {
        Self {
            id,
            vector_path: selection_path.map(|p| p.to_vec()),
            ..Self::default()
        }
    }
}
