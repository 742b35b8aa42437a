//! Color-based segmentation: the magic wand.
//!
//! Selects pixels similar in color to a sampled seed, either as a
//! 4-connected flood fill (contiguous) or a whole-buffer scan, then derives
//! an approximate boundary polygon via an 8-connected edge walk. The outline
//! is consumed only by path rasterization, so it does not need to be a
//! closed or simple polygon.

use super::MagicWandOptions;
use crate::geometry::SelectionBounds;
use crate::{PixelBuffer, Point};

/// Result of a color-based segmentation pass.
#[derive(Debug, Clone)]
pub struct WandRegion {
    /// Every matched pixel coordinate.
    pub pixels: Vec<Point>,
    /// Pixel-box bounds of the matched set.
    pub bounds: SelectionBounds,
    /// Approximate boundary polygon of the matched set.
    pub outline: Vec<Point>,
}

/// Sample the color at (floor(x), floor(y)) and collect matching pixels.
///
/// A pixel matches when its Euclidean RGB distance to the target is at most
/// `tolerance * sqrt(3)`; the sqrt(3) scaling is a perceptual-tolerance
/// convention kept for compatibility. Returns `None` when the seed is out of
/// bounds or nothing matches, which callers treat as a no-op.
pub fn select_by_color(
    buffer: &PixelBuffer,
    x: f64,
    y: f64,
    options: &MagicWandOptions,
) -> Option<WandRegion> {
    let width = buffer.width as i64;
    let height = buffer.height as i64;
    let seed_x = x.floor() as i64;
    let seed_y = y.floor() as i64;
    if seed_x < 0 || seed_x >= width || seed_y < 0 || seed_y >= height {
        return None;
    }

    let [tr, tg, tb, _] = buffer.rgba(seed_x as u32, seed_y as u32);
    let max_dist = options.tolerance * 3f64.sqrt();

    let matches = |px: u32, py: u32| -> bool {
        let [r, g, b, _] = buffer.rgba(px, py);
        let dr = r as f64 - tr as f64;
        let dg = g as f64 - tg as f64;
        let db = b as f64 - tb as f64;
        (dr * dr + dg * dg + db * db).sqrt() <= max_dist
    };

    let mut selected: Vec<(u32, u32)> = Vec::new();

    if options.contiguous {
        // Iterative flood fill: explicit stack, each pixel visited at most
        // once via the bitmap keyed by y * width + x.
        let mut visited = vec![false; (width * height) as usize];
        let mut stack: Vec<(i64, i64)> = vec![(seed_x, seed_y)];

        while let Some((px, py)) = stack.pop() {
            if px < 0 || px >= width || py < 0 || py >= height {
                continue;
            }
            let key = (py * width + px) as usize;
            if visited[key] {
                continue;
            }
            visited[key] = true;

            if matches(px as u32, py as u32) {
                selected.push((px as u32, py as u32));
                stack.push((px + 1, py));
                stack.push((px - 1, py));
                stack.push((px, py + 1));
                stack.push((px, py - 1));
            }
        }
    } else {
        for py in 0..buffer.height {
            for px in 0..buffer.width {
                if matches(px, py) {
                    selected.push((px, py));
                }
            }
        }
    }

    if selected.is_empty() {
        return None;
    }

    let bounds = pixel_bounds(&selected);
    let pixels: Vec<Point> = selected
        .iter()
        .map(|&(px, py)| Point::new(px as f64, py as f64))
        .collect();
    let outline = compute_selection_outline(&selected, buffer.width, buffer.height);

    Some(WandRegion {
        pixels,
        bounds,
        outline,
    })
}

/// Bounds of a matched pixel set with one-pixel extent per cell, so a solid
/// 5x5 block reports width and height 5.
fn pixel_bounds(pixels: &[(u32, u32)]) -> SelectionBounds {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    for &(x, y) in pixels {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    SelectionBounds::new(
        min_x as f64,
        min_y as f64,
        (max_x - min_x + 1) as f64,
        (max_y - min_y + 1) as f64,
    )
}

/// Extract an approximate boundary polygon from a matched pixel set.
///
/// Edge pixels are matched pixels with a 4-connected neighbor outside the
/// set (buffer borders count as outside). If there are none, the raw pixel
/// list is returned. Otherwise an 8-connected walk starts at the first edge
/// pixel and repeatedly steps to the next unvisited edge pixel, trying the 8
/// neighbors clockwise from east. The walk stops when stuck or after
/// 2 * edge_count steps; the cap guards against non-simple pixel shapes.
pub fn compute_selection_outline(pixels: &[(u32, u32)], width: u32, height: u32) -> Vec<Point> {
    if pixels.is_empty() {
        return Vec::new();
    }

    let w = width as i64;
    let h = height as i64;
    let idx = |x: i64, y: i64| (y * w + x) as usize;

    let mut in_set = vec![false; (w * h) as usize];
    for &(x, y) in pixels {
        in_set[idx(x as i64, y as i64)] = true;
    }

    let inside = |x: i64, y: i64| x >= 0 && x < w && y >= 0 && y < h && in_set[idx(x, y)];

    let mut edge_mask = vec![false; (w * h) as usize];
    let mut edge_pixels: Vec<(i64, i64)> = Vec::new();
    for &(px, py) in pixels {
        let (x, y) = (px as i64, py as i64);
        let is_edge =
            !inside(x - 1, y) || !inside(x + 1, y) || !inside(x, y - 1) || !inside(x, y + 1);
        if is_edge {
            edge_mask[idx(x, y)] = true;
            edge_pixels.push((x, y));
        }
    }

    if edge_pixels.is_empty() {
        return pixels
            .iter()
            .map(|&(x, y)| Point::new(x as f64, y as f64))
            .collect();
    }

    // Clockwise from east.
    const DIRECTIONS: [(i64, i64); 8] = [
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
    ];

    let mut visited = vec![false; (w * h) as usize];
    let mut outline = Vec::with_capacity(edge_pixels.len());

    let (mut cx, mut cy) = edge_pixels[0];
    outline.push(Point::new(cx as f64, cy as f64));
    visited[idx(cx, cy)] = true;

    for _ in 0..edge_pixels.len() * 2 {
        let mut found = false;
        for (dx, dy) in DIRECTIONS {
            let (nx, ny) = (cx + dx, cy + dy);
            if nx < 0 || nx >= w || ny < 0 || ny >= h {
                continue;
            }
            let key = idx(nx, ny);
            if !visited[key] && edge_mask[key] {
                outline.push(Point::new(nx as f64, ny as f64));
                visited[key] = true;
                cx = nx;
                cy = ny;
                found = true;
                break;
            }
        }
        if !found {
            break;
        }
    }

    outline
}
