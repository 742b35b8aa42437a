//! Session-owned selection state.
//!
//! The editor holds one `SelectionState` per open document and mutates it
//! through the methods here; there is no global singleton, so tests and
//! multi-document sessions run isolated instances. Operations follow the
//! fail-soft policy: acting on an absent selection is a no-op.

use super::{
    combine_selections, ColorRangeOptions, MagicWandOptions, Selection, SelectionMode,
    SelectionType,
};
use crate::geometry::{bounds_from_path, SelectionBounds};
use crate::{PixelBuffer, Point};
use serde::{Deserialize, Serialize};

/// Selection state for one editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionState {
    /// The current active selection, if any.
    pub active: Option<Selection>,
    /// Saved selections in creation order, independent of the active one.
    pub saved: Vec<Selection>,
    /// How the next produced shape merges with the active selection.
    pub mode: SelectionMode,
    /// Marching-ants overlay toggle (display flag only).
    pub marching: bool,
    pub magic_wand_options: MagicWandOptions,
    pub color_range_options: ColorRangeOptions,
    is_selecting: bool,
    pending_kind: SelectionType,
    temp_path: Vec<Point>,
    start_point: Option<Point>,
    next_id: u64,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            active: None,
            saved: Vec::new(),
            mode: SelectionMode::New,
            marching: true,
            magic_wand_options: MagicWandOptions::default(),
            color_range_options: ColorRangeOptions::default(),
            is_selecting: false,
            pending_kind: SelectionType::Rectangular,
            temp_path: Vec::new(),
            start_point: None,
            next_id: 1,
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between a `start_selection` and the matching finish/cancel.
    pub fn is_selecting(&self) -> bool {
        self.is_selecting
    }

    pub fn has_selection(&self) -> bool {
        self.active.is_some()
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin an interactive selection at `point`. No-op if one is already
    /// in progress.
    pub fn start_selection(&mut self, kind: SelectionType, point: Point) {
        if self.is_selecting {
            return;
        }
        self.is_selecting = true;
        self.pending_kind = kind;
        self.start_point = Some(point);
        self.temp_path = vec![point];
    }

    /// Append a point to the in-progress path. No-op unless selecting.
    pub fn update_selection(&mut self, point: Point) {
        if !self.is_selecting || self.start_point.is_none() {
            return;
        }
        self.temp_path.push(point);
    }

    /// Complete the interactive selection and merge it with the active one
    /// according to the current mode. Returns the resulting active selection,
    /// or `None` if no selection was in progress.
    ///
    /// A two-point temp path is treated as a rectangle drag and synthesizes a
    /// 4-corner path from the two corners; anything else is kept verbatim as
    /// a free-form polygon.
    pub fn finish_selection(&mut self) -> Option<Selection> {
        if !self.is_selecting {
            return None;
        }
        let start = self.start_point?;
        let temp = std::mem::take(&mut self.temp_path);
        self.is_selecting = false;
        self.start_point = None;

        let id = self.fresh_id();
        let mut new_selection = if temp.len() == 2 {
            let end = temp[1];
            let bounds = SelectionBounds::new(
                start.x.min(end.x),
                start.y.min(end.y),
                (end.x - start.x).abs(),
                (end.y - start.y).abs(),
            );
            Selection {
                id,
                bounds,
                path: bounds.corner_path(),
                ..Selection::empty()
            }
        } else {
            Selection {
                id,
                bounds: bounds_from_path(&temp),
                path: temp,
                ..Selection::empty()
            }
        };
        new_selection.kind = self.pending_kind;

        let final_selection = match (&self.active, self.mode) {
            (Some(active), mode) if mode != SelectionMode::New => {
                combine_selections(active, &new_selection, mode)
            }
            _ => new_selection,
        };

        self.active = Some(final_selection.clone());
        Some(final_selection)
    }

    /// Discard the in-progress path without producing a selection.
    pub fn cancel_selection(&mut self) {
        self.is_selecting = false;
        self.temp_path.clear();
        self.start_point = None;
    }

    pub fn set_active_selection(&mut self, selection: Option<Selection>) {
        self.active = selection;
    }

    pub fn clear_selection(&mut self) {
        self.active = None;
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    pub fn set_magic_wand_options(&mut self, options: MagicWandOptions) {
        self.magic_wand_options = options;
    }

    pub fn set_color_range_options(&mut self, options: ColorRangeOptions) {
        self.color_range_options = options;
    }

    /// Select the full canvas as a rectangular selection.
    pub fn select_all(&mut self, bounds: SelectionBounds) {
        let id = self.fresh_id();
        self.active = Some(Selection::rectangular(id, bounds));
    }

    /// Invert the active selection within the canvas.
    ///
    /// With no active selection this selects everything. Otherwise the shape
    /// is kept and its complement fill-rule flag is toggled; the rasterizing
    /// consumer fills the other side of the path against `canvas_bounds`.
    pub fn invert_selection(&mut self, canvas_bounds: SelectionBounds) {
        let Some(active) = &self.active else {
            self.select_all(canvas_bounds);
            return;
        };
        let mut inverted = active.clone();
        inverted.id = self.fresh_id();
        inverted.inverted = !inverted.inverted;
        self.active = Some(inverted);
    }

    /// Set the feather radius on the active selection. No pixel work happens
    /// here; feather is realized by the mask compositor. No-op without an
    /// active selection.
    pub fn feather_selection(&mut self, amount: f64) {
        if let Some(active) = &mut self.active {
            active.feather = amount;
        }
    }

    /// Grow the active selection by `amount` pixels.
    ///
    /// Every path point is scaled radially away from the bounds centroid by
    /// `amount` pixels of distance, and the bounds grow by `amount` on all
    /// sides. This is a uniform offset approximation, not a morphological
    /// dilate; the behavior is reproduced for compatibility.
    pub fn expand_selection(&mut self, amount: f64) {
        let Some(active) = &mut self.active else {
            return;
        };

        let center = active.bounds.center();
        let new_path: Vec<Point> = active
            .path
            .iter()
            .map(|p| {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                let dist = (dx * dx + dy * dy).sqrt();
                let scale = if dist > 0.0 { (dist + amount) / dist } else { 1.0 };
                Point::new(center.x + dx * scale, center.y + dy * scale)
            })
            .collect();

        active.bounds = SelectionBounds::new(
            active.bounds.x - amount,
            active.bounds.y - amount,
            active.bounds.width + amount * 2.0,
            active.bounds.height + amount * 2.0,
        );
        active.path = new_path;
    }

    /// Shrink the active selection by `amount` pixels (expand by the
    /// negative amount).
    pub fn contract_selection(&mut self, amount: f64) {
        self.expand_selection(-amount);
    }

    /// Clone the active selection into the saved list under a new id.
    /// No-op without an active selection.
    pub fn save_selection(&mut self) {
        let Some(active) = self.active.clone() else {
            return;
        };
        let mut saved = active;
        saved.id = self.fresh_id();
        self.saved.push(saved);
    }

    /// Combine a saved selection into the active one per the current mode.
    /// No-op if the id is unknown.
    pub fn load_selection(&mut self, id: u64) {
        let Some(selection) = self.saved.iter().find(|s| s.id == id).cloned() else {
            return;
        };
        let final_selection = match (&self.active, self.mode) {
            (Some(active), mode) if mode != SelectionMode::New => {
                combine_selections(active, &selection, mode)
            }
            _ => selection,
        };
        self.active = Some(final_selection);
    }

    /// Remove a saved selection by id. No-op if the id is unknown.
    pub fn delete_selection(&mut self, id: u64) {
        self.saved.retain(|s| s.id != id);
    }

    /// Magic-wand selection: sample the color under (x, y) and select
    /// similar pixels per `options`, merging the result into the active
    /// selection. A zero-match sample leaves the selection unchanged.
    pub fn select_by_color(
        &mut self,
        buffer: &PixelBuffer,
        x: f64,
        y: f64,
        options: &MagicWandOptions,
    ) -> Option<&Selection> {
        let region = super::wand::select_by_color(buffer, x, y, options)?;

        let new_selection = Selection {
            id: self.fresh_id(),
            kind: SelectionType::MagicWand,
            bounds: region.bounds,
            path: region.outline,
            ..Selection::empty()
        };

        let final_selection = match (&self.active, self.mode) {
            (Some(active), mode) if mode != SelectionMode::New => {
                combine_selections(active, &new_selection, mode)
            }
            _ => new_selection,
        };
        self.active = Some(final_selection);
        self.active.as_ref()
    }
}
