//! Geometric image transforms.
//!
//! The perspective warp maps a source quadrilateral to a destination
//! quadrilateral via a 3x3 homography and resamples the image by inverse
//! mapping every destination pixel.
//!
//! # Coordinate System
//!
//! - Corner positions are in source pixel coordinates, origin top-left
//! - The output canvas is anchored at the destination corners' bounding-box
//!   origin, so warps that move content into negative coordinates still
//!   render fully

mod perspective;

pub use perspective::{
    apply_perspective_transform, compute_perspective_matrix, constrain_perspective,
    corners_from_rect, hit_test_corner, invert_perspective_matrix, is_valid_perspective,
    move_corner, transform_point, CornerHandle, PerspectiveCorners, PerspectiveMatrix,
};

use serde::{Deserialize, Serialize};

/// Resampling filter for the warp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Nearest-neighbor: fast, blocky.
    Nearest,
    /// Bilinear: blends the 4 nearest source pixels on every channel.
    #[default]
    Bilinear,
}
