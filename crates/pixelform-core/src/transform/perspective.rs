//! Perspective warp: homography solve, inversion, and inverse-mapped
//! resampling, plus the corner-handle geometry used by interactive editing.

use super::Interpolation;
use crate::{PixelBuffer, Point};
use serde::{Deserialize, Serialize};

/// The four corners of a perspective quadrilateral, in source pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCorners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

/// Row-major 3x3 projective transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveMatrix {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
    pub m20: f64,
    pub m21: f64,
    pub m22: f64,
}

impl PerspectiveMatrix {
    pub const IDENTITY: Self = Self {
        m00: 1.0,
        m01: 0.0,
        m02: 0.0,
        m10: 0.0,
        m11: 1.0,
        m12: 0.0,
        m20: 0.0,
        m21: 0.0,
        m22: 1.0,
    };
}

/// One of the four draggable corner handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl PerspectiveCorners {
    /// Corners in the TL, TR, BR, BL cycle used by the solver and the
    /// convexity check.
    fn cycle(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

/// Build an axis-aligned corner set from a rectangle.
pub fn corners_from_rect(x: f64, y: f64, width: f64, height: f64) -> PerspectiveCorners {
    PerspectiveCorners {
        top_left: Point::new(x, y),
        top_right: Point::new(x + width, y),
        bottom_left: Point::new(x, y + height),
        bottom_right: Point::new(x + width, y + height),
    }
}

/// Return a copy of `corners` with one handle displaced by (dx, dy).
pub fn move_corner(
    corners: &PerspectiveCorners,
    handle: CornerHandle,
    dx: f64,
    dy: f64,
) -> PerspectiveCorners {
    let mut moved = *corners;
    let corner = match handle {
        CornerHandle::TopLeft => &mut moved.top_left,
        CornerHandle::TopRight => &mut moved.top_right,
        CornerHandle::BottomLeft => &mut moved.bottom_left,
        CornerHandle::BottomRight => &mut moved.bottom_right,
    };
    corner.x += dx;
    corner.y += dy;
    moved
}

/// Solve `A x = b` for an 8x8 system by Gaussian elimination with partial
/// pivoting. Returns `None` when a pivot falls below 1e-10.
fn solve_linear_system(a: [[f64; 8]; 8], b: [f64; 8]) -> Option<[f64; 8]> {
    let mut aug = [[0.0f64; 9]; 8];
    for (i, row) in a.iter().enumerate() {
        aug[i][..8].copy_from_slice(row);
        aug[i][8] = b[i];
    }

    for col in 0..8 {
        let mut max_row = col;
        for row in col + 1..8 {
            if aug[row][col].abs() > aug[max_row][col].abs() {
                max_row = row;
            }
        }
        aug.swap(col, max_row);

        if aug[col][col].abs() < 1e-10 {
            return None;
        }

        for row in col + 1..8 {
            let factor = aug[row][col] / aug[col][col];
            for j in col..9 {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..8).rev() {
        let mut sum = aug[i][8];
        for j in i + 1..8 {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }
    Some(x)
}

/// Compute the homography mapping `src` corners onto `dst` corners.
///
/// Each corner pair contributes two rows of the standard 8-unknown direct
/// linear system with `m22` fixed at 1. A singular system (degenerate corner
/// placement) resolves to the identity matrix rather than an error.
pub fn compute_perspective_matrix(
    src: &PerspectiveCorners,
    dst: &PerspectiveCorners,
) -> PerspectiveMatrix {
    let src_pts = src.cycle();
    let dst_pts = dst.cycle();

    let mut a = [[0.0f64; 8]; 8];
    let mut b = [0.0f64; 8];
    for i in 0..4 {
        let (sx, sy) = (src_pts[i].x, src_pts[i].y);
        let (dx, dy) = (dst_pts[i].x, dst_pts[i].y);

        a[i * 2] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
        b[i * 2] = dx;
        a[i * 2 + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
        b[i * 2 + 1] = dy;
    }

    match solve_linear_system(a, b) {
        Some(c) => PerspectiveMatrix {
            m00: c[0],
            m01: c[1],
            m02: c[2],
            m10: c[3],
            m11: c[4],
            m12: c[5],
            m20: c[6],
            m21: c[7],
            m22: 1.0,
        },
        None => PerspectiveMatrix::IDENTITY,
    }
}

/// Map a point through the projective transform. A homogeneous weight near
/// zero (the point at infinity) maps to the origin.
pub fn transform_point(x: f64, y: f64, matrix: &PerspectiveMatrix) -> Point {
    let w = matrix.m20 * x + matrix.m21 * y + matrix.m22;
    if w.abs() < 1e-10 {
        return Point::new(0.0, 0.0);
    }
    Point::new(
        (matrix.m00 * x + matrix.m01 * y + matrix.m02) / w,
        (matrix.m10 * x + matrix.m11 * y + matrix.m12) / w,
    )
}

/// Invert the transform via the adjugate. Returns `None` when the
/// determinant magnitude falls below 1e-10.
pub fn invert_perspective_matrix(matrix: &PerspectiveMatrix) -> Option<PerspectiveMatrix> {
    let PerspectiveMatrix {
        m00,
        m01,
        m02,
        m10,
        m11,
        m12,
        m20,
        m21,
        m22,
    } = *matrix;

    let det = m00 * (m11 * m22 - m12 * m21) - m01 * (m10 * m22 - m12 * m20)
        + m02 * (m10 * m21 - m11 * m20);
    if det.abs() < 1e-10 {
        return None;
    }

    let inv_det = 1.0 / det;
    Some(PerspectiveMatrix {
        m00: (m11 * m22 - m12 * m21) * inv_det,
        m01: (m02 * m21 - m01 * m22) * inv_det,
        m02: (m01 * m12 - m02 * m11) * inv_det,
        m10: (m12 * m20 - m10 * m22) * inv_det,
        m11: (m00 * m22 - m02 * m20) * inv_det,
        m12: (m02 * m10 - m00 * m12) * inv_det,
        m20: (m10 * m21 - m11 * m20) * inv_det,
        m21: (m01 * m20 - m00 * m21) * inv_det,
        m22: (m00 * m11 - m01 * m10) * inv_det,
    })
}

/// Axis-aligned bounding box of a corner set.
fn corner_bounds(corners: &PerspectiveCorners) -> (f64, f64, f64, f64) {
    let pts = corners.cycle();
    let mut min_x = pts[0].x;
    let mut max_x = pts[0].x;
    let mut min_y = pts[0].y;
    let mut max_y = pts[0].y;
    for p in &pts[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    (min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Warp `buffer` so that the `src` quadrilateral lands on the `dst`
/// quadrilateral.
///
/// Every destination pixel is inverse-mapped into the source; samples that
/// fall outside the source stay fully transparent. The output canvas defaults
/// to the ceiling of the destination corners' bounding box and is anchored at
/// that box's origin, so destinations with negative coordinates still render.
/// A non-invertible warp produces an all-transparent canvas.
pub fn apply_perspective_transform(
    buffer: &PixelBuffer,
    src: &PerspectiveCorners,
    dst: &PerspectiveCorners,
    output_width: Option<u32>,
    output_height: Option<u32>,
    interpolation: Interpolation,
) -> PixelBuffer {
    let (origin_x, origin_y, bounds_w, bounds_h) = corner_bounds(dst);
    let dst_width = output_width.unwrap_or(bounds_w.ceil() as u32).max(1);
    let dst_height = output_height.unwrap_or(bounds_h.ceil() as u32).max(1);

    let mut result = PixelBuffer::transparent(dst_width, dst_height);

    let matrix = compute_perspective_matrix(src, dst);
    let inverse = match invert_perspective_matrix(&matrix) {
        Some(m) => m,
        None => return result,
    };

    let src_w = buffer.width as f64;
    let src_h = buffer.height as f64;

    for dst_y in 0..dst_height {
        for dst_x in 0..dst_width {
            let world_x = origin_x + dst_x as f64;
            let world_y = origin_y + dst_y as f64;
            let sp = transform_point(world_x, world_y, &inverse);

            if sp.x < 0.0 || sp.x >= src_w || sp.y < 0.0 || sp.y >= src_h {
                continue;
            }

            match interpolation {
                Interpolation::Nearest => {
                    let sx = (sp.x.round() as u32).min(buffer.width - 1);
                    let sy = (sp.y.round() as u32).min(buffer.height - 1);
                    result.set_rgba(dst_x, dst_y, buffer.rgba(sx, sy));
                }
                Interpolation::Bilinear => {
                    let x0 = sp.x.floor() as u32;
                    let y0 = sp.y.floor() as u32;
                    let x1 = (x0 + 1).min(buffer.width - 1);
                    let y1 = (y0 + 1).min(buffer.height - 1);
                    let fx = sp.x - x0 as f64;
                    let fy = sp.y - y0 as f64;

                    let p00 = buffer.rgba(x0, y0);
                    let p10 = buffer.rgba(x1, y0);
                    let p01 = buffer.rgba(x0, y1);
                    let p11 = buffer.rgba(x1, y1);

                    let mut out = [0u8; 4];
                    for c in 0..4 {
                        let v = p00[c] as f64 * (1.0 - fx) * (1.0 - fy)
                            + p10[c] as f64 * fx * (1.0 - fy)
                            + p01[c] as f64 * (1.0 - fx) * fy
                            + p11[c] as f64 * fx * fy;
                        out[c] = v.round() as u8;
                    }
                    result.set_rgba(dst_x, dst_y, out);
                }
            }
        }
    }

    result
}

/// True when the quadrilateral is convex and non-self-intersecting, judged
/// by consistent cross-product signs around the TL, TR, BR, BL cycle.
pub fn is_valid_perspective(corners: &PerspectiveCorners) -> bool {
    let pts = corners.cycle();
    let cross = |o: Point, a: Point, b: Point| (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x);

    let mut sign = 0.0f64;
    for i in 0..4 {
        let c = cross(pts[i], pts[(i + 1) % 4], pts[(i + 2) % 4]);
        if c != 0.0 {
            if sign == 0.0 {
                sign = c.signum();
            } else if c.signum() != sign {
                return false;
            }
        }
    }
    true
}

/// Pull runaway corners back toward the quad's centroid.
///
/// Each corner's distance from the 4-corner centroid is capped at
/// `max(|dx|, |dy|) / max_skew`, limiting how far the quad can shear before
/// the warp degenerates.
pub fn constrain_perspective(corners: &PerspectiveCorners, max_skew: f64) -> PerspectiveCorners {
    let pts = corners.cycle();
    let cx = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;

    let constrain = |p: Point| {
        let dx = p.x - cx;
        let dy = p.y - cy;
        let dist = dx.hypot(dy);
        let max_dist = dx.abs().max(dy.abs()) / max_skew;
        if dist > max_dist && max_dist > 0.0 {
            let scale = max_dist / dist;
            Point::new(cx + dx * scale, cy + dy * scale)
        } else {
            p
        }
    };

    PerspectiveCorners {
        top_left: constrain(corners.top_left),
        top_right: constrain(corners.top_right),
        bottom_left: constrain(corners.bottom_left),
        bottom_right: constrain(corners.bottom_right),
    }
}

/// Find the corner handle within `threshold` pixels of (x, y), if any.
/// Handles are tested in TL, TR, BL, BR order; the first hit wins.
pub fn hit_test_corner(
    x: f64,
    y: f64,
    corners: &PerspectiveCorners,
    threshold: f64,
) -> Option<CornerHandle> {
    let candidates = [
        (CornerHandle::TopLeft, corners.top_left),
        (CornerHandle::TopRight, corners.top_right),
        (CornerHandle::BottomLeft, corners.bottom_left),
        (CornerHandle::BottomRight, corners.bottom_right),
    ];
    candidates
        .into_iter()
        .find(|(_, p)| (x - p.x).hypot(y - p.y) <= threshold)
        .map(|(handle, _)| handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> PerspectiveCorners {
        corners_from_rect(0.0, 0.0, 1.0, 1.0)
    }

    fn assert_matrix_near(a: &PerspectiveMatrix, b: &PerspectiveMatrix, tol: f64) {
        let pairs = [
            (a.m00, b.m00),
            (a.m01, b.m01),
            (a.m02, b.m02),
            (a.m10, b.m10),
            (a.m11, b.m11),
            (a.m12, b.m12),
            (a.m20, b.m20),
            (a.m21, b.m21),
            (a.m22, b.m22),
        ];
        for (x, y) in pairs {
            assert!((x - y).abs() < tol, "matrix mismatch: {} vs {}", x, y);
        }
    }

    #[test]
    fn test_identity_mapping() {
        let m = compute_perspective_matrix(&unit_square(), &unit_square());
        assert_matrix_near(&m, &PerspectiveMatrix::IDENTITY, 1e-9);
    }

    #[test]
    fn test_translation_mapping() {
        let src = corners_from_rect(0.0, 0.0, 10.0, 10.0);
        let dst = corners_from_rect(5.0, -3.0, 10.0, 10.0);
        let m = compute_perspective_matrix(&src, &dst);
        let p = transform_point(2.0, 7.0, &m);
        assert!((p.x - 7.0).abs() < 1e-9);
        assert!((p.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_corners_give_identity() {
        // All four source corners collapsed to one point: singular system.
        let src = corners_from_rect(5.0, 5.0, 0.0, 0.0);
        let dst = corners_from_rect(0.0, 0.0, 10.0, 10.0);
        let m = compute_perspective_matrix(&src, &dst);
        assert_matrix_near(&m, &PerspectiveMatrix::IDENTITY, 1e-9);
    }

    #[test]
    fn test_transform_point_at_infinity() {
        let m = PerspectiveMatrix {
            m20: 1.0,
            m21: 0.0,
            m22: -2.0,
            ..PerspectiveMatrix::IDENTITY
        };
        // w = x - 2 vanishes at x = 2.
        let p = transform_point(2.0, 5.0, &m);
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn test_invert_identity() {
        let inv = invert_perspective_matrix(&PerspectiveMatrix::IDENTITY)
            .expect("identity is invertible");
        assert_matrix_near(&inv, &PerspectiveMatrix::IDENTITY, 1e-12);
    }

    #[test]
    fn test_invert_singular_is_none() {
        let singular = PerspectiveMatrix {
            m00: 1.0,
            m01: 2.0,
            m02: 3.0,
            m10: 2.0,
            m11: 4.0,
            m12: 6.0,
            m20: 0.0,
            m21: 0.0,
            m22: 1.0,
        };
        assert!(invert_perspective_matrix(&singular).is_none());
    }

    #[test]
    fn test_warp_identity_preserves_image() {
        let mut buf = PixelBuffer::transparent(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                let v = (y * 4 + x) as u8 * 10;
                buf.set_rgba(x, y, [v, v, v, 255]);
            }
        }
        let corners = corners_from_rect(0.0, 0.0, 4.0, 4.0);
        let out = apply_perspective_transform(
            &buf,
            &corners,
            &corners,
            None,
            None,
            Interpolation::Nearest,
        );
        assert_eq!(out, buf);
    }

    #[test]
    fn test_warp_translation_moves_content() {
        let mut buf = PixelBuffer::transparent(4, 4);
        buf.set_rgba(0, 0, [255, 0, 0, 255]);

        let src = corners_from_rect(0.0, 0.0, 4.0, 4.0);
        let dst = corners_from_rect(2.0, 1.0, 4.0, 4.0);
        let out = apply_perspective_transform(
            &buf,
            &src,
            &dst,
            Some(8),
            Some(8),
            Interpolation::Nearest,
        );

        // Canvas is anchored at the dst bbox origin (2, 1), so the moved
        // pixel lands back at canvas (0, 0).
        assert_eq!(out.width, 8);
        assert_eq!(out.rgba(0, 0), [255, 0, 0, 255]);
        // Pixels past the warped source extent stay transparent.
        assert_eq!(out.rgba(7, 7), [0, 0, 0, 0]);
    }

    #[test]
    fn test_warp_negative_destination_is_anchored() {
        let buf = PixelBuffer::filled(4, 4, [9, 9, 9, 255]);
        let src = corners_from_rect(0.0, 0.0, 4.0, 4.0);
        let dst = corners_from_rect(-2.0, -2.0, 4.0, 4.0);
        let out =
            apply_perspective_transform(&buf, &src, &dst, None, None, Interpolation::Nearest);
        assert_eq!((out.width, out.height), (4, 4));
        assert_eq!(out.rgba(0, 0), [9, 9, 9, 255]);
    }

    #[test]
    fn test_bilinear_blends_neighbors() {
        // 2x1 image, black then white, scaled up 2x: the odd canvas column
        // inverse-maps to source x=0.5, an even blend of the two pixels.
        let mut buf = PixelBuffer::transparent(2, 1);
        buf.set_rgba(0, 0, [0, 0, 0, 255]);
        buf.set_rgba(1, 0, [255, 255, 255, 255]);

        let src = corners_from_rect(0.0, 0.0, 2.0, 1.0);
        let dst = corners_from_rect(0.0, 0.0, 4.0, 1.0);
        let out = apply_perspective_transform(
            &buf,
            &src,
            &dst,
            Some(4),
            Some(1),
            Interpolation::Bilinear,
        );
        assert_eq!(out.rgba(0, 0), [0, 0, 0, 255]);
        assert_eq!(out.rgba(1, 0), [128, 128, 128, 255]);
        assert_eq!(out.rgba(2, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_out_of_bounds_samples_transparent() {
        let buf = PixelBuffer::filled(2, 2, [50, 50, 50, 255]);
        let src = corners_from_rect(0.0, 0.0, 2.0, 2.0);
        // Shrink toward the center: the outer ring of the 4x4 canvas maps
        // outside the source.
        let dst = corners_from_rect(1.0, 1.0, 2.0, 2.0);
        let out = apply_perspective_transform(
            &buf,
            &src,
            &dst,
            Some(4),
            Some(4),
            Interpolation::Nearest,
        );
        assert_eq!(out.rgba(3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn test_corners_from_rect_layout() {
        let c = corners_from_rect(1.0, 2.0, 10.0, 20.0);
        assert_eq!(c.top_left, Point::new(1.0, 2.0));
        assert_eq!(c.top_right, Point::new(11.0, 2.0));
        assert_eq!(c.bottom_left, Point::new(1.0, 22.0));
        assert_eq!(c.bottom_right, Point::new(11.0, 22.0));
    }

    #[test]
    fn test_move_corner_is_pure() {
        let c = corners_from_rect(0.0, 0.0, 10.0, 10.0);
        let moved = move_corner(&c, CornerHandle::BottomRight, 3.0, -2.0);
        assert_eq!(moved.bottom_right, Point::new(13.0, 8.0));
        assert_eq!(moved.top_left, c.top_left);
        assert_eq!(c.bottom_right, Point::new(10.0, 10.0), "input untouched");
    }

    #[test]
    fn test_valid_perspective_rejects_crossed_quad() {
        let c = corners_from_rect(0.0, 0.0, 10.0, 10.0);
        assert!(is_valid_perspective(&c));

        // Swap the bottom corners: a bow-tie.
        let crossed = PerspectiveCorners {
            bottom_left: c.bottom_right,
            bottom_right: c.bottom_left,
            ..c
        };
        assert!(!is_valid_perspective(&crossed));
    }

    #[test]
    fn test_constrain_limits_runaway_corner() {
        let c = corners_from_rect(0.0, 0.0, 10.0, 10.0);
        let dragged = move_corner(&c, CornerHandle::TopLeft, -100.0, -100.0);
        let constrained = constrain_perspective(&dragged, 0.8);

        // The dragged corner moves back toward the centroid; a corner whose
        // offset is dominated by one axis stays within its skew limit.
        let cx = (constrained.top_left.x - dragged.top_left.x).abs();
        assert!(cx > 0.0, "runaway corner should be pulled in");
        assert_eq!(constrained.top_right, dragged.top_right);
    }

    #[test]
    fn test_hit_test_corner() {
        let c = corners_from_rect(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            hit_test_corner(3.0, 4.0, &c, 10.0),
            Some(CornerHandle::TopLeft)
        );
        assert_eq!(
            hit_test_corner(98.0, 103.0, &c, 10.0),
            Some(CornerHandle::BottomRight)
        );
        assert_eq!(hit_test_corner(50.0, 50.0, &c, 10.0), None);
    }
}
