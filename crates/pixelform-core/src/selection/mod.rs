//! Selection model: region-of-interest descriptions and their boolean combinator.
//!
//! A selection is a polygon path plus bounds/feather/opacity metadata. The
//! combinator merges a newly drawn shape into the existing active selection
//! according to the selection mode. `add` is a path-concatenation
//! approximation (not true polygon union) and `subtract`/`intersect` keep the
//! existing selection unchanged; downstream consumers only rasterize the
//! path, so the approximation is preserved deliberately.

mod state;
mod wand;

pub use state::SelectionState;
pub use wand::{compute_selection_outline, select_by_color, WandRegion};

use crate::geometry::{bounds_from_path, SelectionBounds};
use crate::Point;
use serde::{Deserialize, Serialize};

/// The tool family a selection was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionType {
    #[default]
    Rectangular,
    Elliptical,
    Lasso,
    Polygonal,
    MagicWand,
    ColorRange,
}

/// How a new shape merges with the existing active selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    New,
    Add,
    Subtract,
    Intersect,
}

/// Options for the magic wand (color similarity) tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagicWandOptions {
    /// Color tolerance, 0-255. Matches use Euclidean RGB distance scaled
    /// by sqrt(3) so that tolerance 255 admits every color.
    pub tolerance: f64,
    /// Flood fill from the seed (true) or scan the whole buffer (false).
    pub contiguous: bool,
    /// Sample the composited image instead of the current layer.
    pub sample_all_layers: bool,
}

impl Default for MagicWandOptions {
    fn default() -> Self {
        Self {
            tolerance: 32.0,
            contiguous: true,
            sample_all_layers: false,
        }
    }
}

/// Hue/tone band targeted by color-range selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRangeBand {
    #[default]
    Sampled,
    Reds,
    Yellows,
    Greens,
    Cyans,
    Blues,
    Magentas,
    Highlights,
    Midtones,
    Shadows,
}

/// Options for color-range selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRangeOptions {
    pub fuzziness: f64,
    pub range: ColorRangeBand,
    pub invert: bool,
}

impl Default for ColorRangeOptions {
    fn default() -> Self {
        Self {
            fuzziness: 40.0,
            range: ColorRangeBand::Sampled,
            invert: false,
        }
    }
}

/// A region of interest on a layer.
///
/// Invariant: `bounds` equals (or conservatively contains) the bounding box
/// of `path` for non-rectangular/elliptical types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Session-local identifier. Stable across combine operations so that
    /// saved-selection references remain valid.
    pub id: u64,
    pub kind: SelectionType,
    pub bounds: SelectionBounds,
    /// Polygon approximation of the region, closed implicitly.
    pub path: Vec<Point>,
    /// Edge blur radius in pixels, realized later by the mask compositor.
    pub feather: f64,
    pub anti_alias: bool,
    pub opacity: f64,
    /// Fill-rule flag: when set, consumers rasterize the geometric complement
    /// of `path` within the canvas bounds. Path concatenation cannot
    /// represent a true complement, so inversion is carried here instead.
    pub inverted: bool,
}

impl Selection {
    /// An empty rectangular selection with zero bounds.
    pub fn empty() -> Self {
        Self {
            id: 0,
            kind: SelectionType::Rectangular,
            bounds: SelectionBounds::default(),
            path: Vec::new(),
            feather: 0.0,
            anti_alias: true,
            opacity: 1.0,
            inverted: false,
        }
    }

    /// A rectangular selection covering `bounds` with a 4-corner path.
    pub fn rectangular(id: u64, bounds: SelectionBounds) -> Self {
        Self {
            id,
            bounds,
            path: bounds.corner_path(),
            ..Self::empty()
        }
    }

    /// The polygon handed to the rasterization collaborator.
    ///
    /// Rectangular selections emit their 4-corner bounds, elliptical
    /// selections a sampled ellipse polygon, everything else the stored path.
    pub fn to_outline_path(&self) -> Vec<Point> {
        match self.kind {
            SelectionType::Rectangular => self.bounds.corner_path(),
            SelectionType::Elliptical => {
                let c = self.bounds.center();
                let rx = self.bounds.width / 2.0;
                let ry = self.bounds.height / 2.0;
                // 64 segments is plenty for marching-ants display and fill.
                (0..64)
                    .map(|i| {
                        let theta = i as f64 / 64.0 * std::f64::consts::TAU;
                        Point::new(c.x + rx * theta.cos(), c.y + ry * theta.sin())
                    })
                    .collect()
            }
            _ => self.path.clone(),
        }
    }
}

/// Merge `new` into `existing` according to `mode`.
///
/// Never mutates its inputs. `New` replaces outright; `Add` concatenates the
/// paths and takes the union bounding box; `Subtract`/`Intersect` keep the
/// existing selection's geometry. On combining paths the result carries the
/// existing selection's id.
pub fn combine_selections(
    existing: &Selection,
    new: &Selection,
    mode: SelectionMode,
) -> Selection {
    if mode == SelectionMode::New {
        return new.clone();
    }

    let mut combined = new.clone();
    combined.id = if existing.id != 0 {
        existing.id
    } else {
        new.id
    };

    match mode {
        SelectionMode::Add => {
            let mut path = existing.path.clone();
            path.extend_from_slice(&new.path);
            combined.bounds = bounds_from_path(&path);
            combined.path = path;
        }
        SelectionMode::Subtract | SelectionMode::Intersect => {
            combined.path = existing.path.clone();
            combined.bounds = existing.bounds;
        }
        SelectionMode::New => unreachable!(),
    }

    combined
}
