//! Editor session state with a linear undo/redo history.
//!
//! The history is a list of full design snapshots plus a cursor. Pushing a
//! snapshot discards everything after the cursor; undo and redo only move
//! the cursor. Boundary undo/redo calls are no-ops, not errors.

use serde::Serialize;

use crate::canvas::CanvasItem;
use crate::design::Design;
use crate::error::CoreError;
use crate::types::EntityId;

/// Default zoom level, in percent.
pub const DEFAULT_ZOOM: u32 = 100;

/// Minimum allowed zoom level, in percent.
pub const MIN_ZOOM: u32 = 10;

/// Maximum allowed zoom level, in percent.
pub const MAX_ZOOM: u32 = 400;

/// Validate that a zoom level is within allowed bounds.
pub fn validate_zoom(zoom: u32) -> Result<(), CoreError> {
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        return Err(CoreError::Validation(format!(
            "Zoom {zoom}% is outside the allowed range [{MIN_ZOOM}, {MAX_ZOOM}]"
        )));
    }
    Ok(())
}

/// One editor session over a single design.
///
/// The session exclusively owns its history. Each snapshot is an
/// independent clone, so editing the current design never reaches into
/// earlier snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeStudioState {
    design: Option<Design>,
    selected_item_id: Option<EntityId>,
    zoom: u32,
    is_dragging: bool,
    history: Vec<Design>,
    #[serde(serialize_with = "serialize_cursor")]
    history_index: Option<usize>,
}

fn serialize_cursor<S: serde::Serializer>(cursor: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
    match cursor {
        Some(i) => s.serialize_i64(*i as i64),
        None => s.serialize_i64(-1),
    }
}

impl Default for CreativeStudioState {
    fn default() -> Self {
        Self::new()
    }
}

impl CreativeStudioState {
    /// An empty session: no design loaded, empty history.
    pub fn new() -> Self {
        Self {
            design: None,
            selected_item_id: None,
            zoom: DEFAULT_ZOOM,
            is_dragging: false,
            history: Vec::new(),
            history_index: None,
        }
    }

    /// Start a session on `design`, recorded as the first snapshot.
    pub fn load(design: Design) -> Self {
        let mut state = Self::new();
        state.push_to_history(design);
        state
    }

    // -- Accessors ----------------------------------------------------------

    pub fn design(&self) -> Option<&Design> {
        self.design.as_ref()
    }

    pub fn selected_item_id(&self) -> Option<&str> {
        self.selected_item_id.as_deref()
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn history(&self) -> &[Design] {
        &self.history
    }

    /// Cursor into the history, `-1` when the history is empty.
    pub fn history_index(&self) -> i64 {
        self.history_index.map_or(-1, |i| i as i64)
    }

    pub fn can_undo(&self) -> bool {
        self.history_index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.history_index
            .is_some_and(|i| i + 1 < self.history.len())
    }

    // -- History ------------------------------------------------------------

    /// Record `design` as a checkpoint and make it current.
    ///
    /// Any redo-able snapshots after the cursor are discarded.
    pub fn push_to_history(&mut self, design: Design) {
        let keep = self.history_index.map_or(0, |i| i + 1);
        self.history.truncate(keep);
        self.history.push(design.clone());
        self.history_index = Some(self.history.len() - 1);
        self.design = Some(design);
    }

    /// Step back one snapshot. Returns `false` at the start of history.
    pub fn undo(&mut self) -> bool {
        match self.history_index {
            Some(i) if i > 0 => {
                self.move_cursor(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Step forward one snapshot. Returns `false` at the end of history.
    pub fn redo(&mut self) -> bool {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                self.move_cursor(i + 1);
                true
            }
            _ => false,
        }
    }

    fn move_cursor(&mut self, index: usize) {
        self.history_index = Some(index);
        self.design = Some(self.history[index].clone());
        self.drop_dangling_selection();
    }

    fn drop_dangling_selection(&mut self) {
        let still_present = match (&self.selected_item_id, &self.design) {
            (Some(id), Some(design)) => design.find_item(id).is_some(),
            (Some(_), None) => false,
            (None, _) => true,
        };
        if !still_present {
            self.selected_item_id = None;
        }
    }

    // -- Transient UI state -------------------------------------------------

    /// Select an item of the current design, or clear the selection.
    pub fn select_item(&mut self, item_id: Option<&str>) -> Result<(), CoreError> {
        let Some(id) = item_id else {
            self.selected_item_id = None;
            return Ok(());
        };
        self.current()?
            .find_item(id)
            .ok_or_else(|| item_not_found(id))?;
        self.selected_item_id = Some(id.to_string());
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: u32) -> Result<(), CoreError> {
        validate_zoom(zoom)?;
        self.zoom = zoom;
        Ok(())
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.is_dragging = dragging;
    }

    // -- Committed edits ----------------------------------------------------

    /// Add an item on top of the canvas and checkpoint.
    pub fn add_item(&mut self, mut item: CanvasItem) -> Result<(), CoreError> {
        let mut next = self.current()?.clone();
        if next.find_item(&item.id).is_some() {
            return Err(CoreError::Conflict(format!(
                "Canvas item '{}' already exists",
                item.id
            )));
        }
        item.z_index = next.next_z_index()?;
        next.items.push(item);
        next.validate()?;
        self.commit(next);
        Ok(())
    }

    /// Edit one unlocked item on a copy of the current design and checkpoint.
    pub fn commit_item_edit<F>(&mut self, item_id: &str, edit: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut CanvasItem),
    {
        let mut next = self.current()?.clone();
        let item = next
            .find_item_mut(item_id)
            .ok_or_else(|| item_not_found(item_id))?;
        ensure_unlocked(item)?;
        edit(item);
        // The id is the selection back-reference; an edit must not change it.
        item.id = item_id.to_string();
        self.commit(next);
        Ok(())
    }

    /// Remove an unlocked, non-background item and checkpoint.
    pub fn remove_item(&mut self, item_id: &str) -> Result<(), CoreError> {
        let mut next = self.current()?.clone();
        let item = next
            .find_item(item_id)
            .ok_or_else(|| item_not_found(item_id))?;
        ensure_unlocked(item)?;
        if item.is_background() {
            return Err(CoreError::Validation(
                "The background item cannot be removed".to_string(),
            ));
        }
        next.items.retain(|i| i.id != item_id);
        self.commit(next);
        if self.selected_item_id.as_deref() == Some(item_id) {
            self.selected_item_id = None;
        }
        Ok(())
    }

    /// Move an item above every other item and checkpoint.
    pub fn bring_to_front(&mut self, item_id: &str) -> Result<(), CoreError> {
        let z = self.current()?.next_z_index()?;
        self.commit_item_edit(item_id, |item| item.z_index = z)
    }

    fn current(&self) -> Result<&Design, CoreError> {
        self.design
            .as_ref()
            .ok_or_else(|| CoreError::Validation("No design is loaded".to_string()))
    }

    fn commit(&mut self, mut next: Design) {
        next.updated_at = chrono::Utc::now();
        self.push_to_history(next);
    }
}

fn item_not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "CanvasItem",
        id: id.to_string(),
    }
}

fn ensure_unlocked(item: &CanvasItem) -> Result<(), CoreError> {
    if item.locked {
        return Err(CoreError::Validation(format!(
            "Canvas item '{}' is locked",
            item.id
        )));
    }
    Ok(())
}
