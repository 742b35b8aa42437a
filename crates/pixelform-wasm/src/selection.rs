//! WASM bindings for the selection session.
//!
//! `SelectionEngine` holds the selection state for one document and exposes
//! the interactive selection lifecycle to JavaScript. Selections cross the
//! boundary as plain objects via serde-wasm-bindgen.

use crate::types::JsPixelBuffer;
use pixelform_core::selection::{ColorRangeOptions, MagicWandOptions};
use pixelform_core::{Point, SelectionBounds, SelectionMode, SelectionState, SelectionType};
use wasm_bindgen::prelude::*;

/// Parse a kebab-case selection tool name ("rectangular", "magic-wand", ...).
fn parse_kind(kind: &str) -> Result<SelectionType, JsValue> {
    serde_wasm_bindgen::from_value(JsValue::from_str(kind))
        .map_err(|e| JsValue::from_str(&format!("Unknown selection type '{}': {}", kind, e)))
}

/// Parse a selection mode name ("new", "add", "subtract", "intersect").
fn parse_mode(mode: &str) -> Result<SelectionMode, JsValue> {
    serde_wasm_bindgen::from_value(JsValue::from_str(mode))
        .map_err(|e| JsValue::from_str(&format!("Unknown selection mode '{}': {}", mode, e)))
}

/// Per-document selection session for JavaScript.
#[wasm_bindgen]
pub struct SelectionEngine {
    inner: SelectionState,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SelectionEngine {
    /// Create an empty session: no active selection, mode "new".
    #[wasm_bindgen(constructor)]
    pub fn new() -> SelectionEngine {
        SelectionEngine {
            inner: SelectionState::new(),
        }
    }

    /// Begin an interactive selection drag. Ignored while another drag is in
    /// progress.
    pub fn start_selection(&mut self, kind: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let kind = parse_kind(kind)?;
        self.inner.start_selection(kind, Point::new(x, y));
        Ok(())
    }

    /// Extend the in-progress drag path.
    pub fn update_selection(&mut self, x: f64, y: f64) {
        self.inner.update_selection(Point::new(x, y));
    }

    /// Commit the drag, merging with the active selection per the current
    /// mode. Returns the resulting selection, or undefined if no drag was in
    /// progress.
    pub fn finish_selection(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.finish_selection() {
            Some(selection) => serde_wasm_bindgen::to_value(&selection)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Abandon the in-progress drag without changing the active selection.
    pub fn cancel_selection(&mut self) {
        self.inner.cancel_selection();
    }

    /// The active selection as a plain object, or undefined.
    pub fn active_selection(&self) -> Result<JsValue, JsValue> {
        match self.inner.active {
            Some(ref selection) => serde_wasm_bindgen::to_value(selection)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn has_selection(&self) -> bool {
        self.inner.has_selection()
    }

    pub fn is_selecting(&self) -> bool {
        self.inner.is_selecting()
    }

    pub fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }

    /// Select the whole canvas.
    pub fn select_all(&mut self, width: f64, height: f64) {
        self.inner.select_all(SelectionBounds {
            x: 0.0,
            y: 0.0,
            width,
            height,
        });
    }

    /// Invert the active selection against the canvas; with no active
    /// selection this selects everything.
    pub fn invert_selection(&mut self, width: f64, height: f64) {
        self.inner.invert_selection(SelectionBounds {
            x: 0.0,
            y: 0.0,
            width,
            height,
        });
    }

    pub fn feather_selection(&mut self, amount: f64) {
        self.inner.feather_selection(amount);
    }

    pub fn expand_selection(&mut self, amount: f64) {
        self.inner.expand_selection(amount);
    }

    pub fn contract_selection(&mut self, amount: f64) {
        self.inner.contract_selection(amount);
    }

    /// Set how the next committed selection merges with the active one.
    pub fn set_selection_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = parse_mode(mode)?;
        self.inner.set_selection_mode(mode);
        Ok(())
    }

    /// Toggle the marching-ants display flag.
    pub fn set_marching(&mut self, marching: bool) {
        self.inner.marching = marching;
    }

    /// Configure the magic wand (`{ tolerance, contiguous, sample_all_layers }`).
    pub fn set_magic_wand_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: MagicWandOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid magic wand options: {}", e)))?;
        self.inner.set_magic_wand_options(options);
        Ok(())
    }

    /// Configure color range sampling (`{ fuzziness, range, invert }`).
    pub fn set_color_range_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: ColorRangeOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid color range options: {}", e)))?;
        self.inner.set_color_range_options(options);
        Ok(())
    }

    /// Magic-wand select at a canvas point using the session's wand options.
    /// Returns the resulting selection, or undefined when nothing matched.
    pub fn select_by_color(
        &mut self,
        image: &JsPixelBuffer,
        x: f64,
        y: f64,
    ) -> Result<JsValue, JsValue> {
        let buffer = image.to_buffer();
        let options = self.inner.magic_wand_options;
        match self.inner.select_by_color(&buffer, x, y, &options) {
            Some(selection) => serde_wasm_bindgen::to_value(selection)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Snapshot the active selection onto the saved list.
    pub fn save_selection(&mut self) {
        self.inner.save_selection();
    }

    /// Merge a saved selection into the active one per the current mode.
    pub fn load_selection(&mut self, id: u64) {
        self.inner.load_selection(id);
    }

    /// Remove a saved selection.
    pub fn delete_selection(&mut self, id: u64) {
        self.inner.delete_selection(id);
    }

    /// Ids of the saved selections, oldest first.
    pub fn saved_selection_ids(&self) -> Vec<u64> {
        self.inner.saved.iter().map(|s| s.id).collect()
    }
}
