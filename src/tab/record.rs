//! Tab record: the role a surface plays in its window

use serde_json::{Map, Value};

use crate::surface::SurfaceId;
use crate::window::WindowId;

/// State of a pinned slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinnedSlotState {
    /// Real content occupies the slot
    Attached,
    /// The slot holds a placeholder waiting for its window to become active
    PlaceholderArmed,
}

/// Per-surface tab state. Exactly one exists per live surface.
#[derive(Debug, Clone)]
pub struct TabRecord {
    identity: SurfaceId,
    pub(crate) owning_window: Option<WindowId>,
    pub(crate) index: Option<usize>,
    pub(crate) pinned: bool,
    pub(crate) is_placeholder: bool,
    pub(crate) window_closing: bool,
    pub(crate) values: Map<String, Value>,
}

impl TabRecord {
    pub fn new(identity: SurfaceId) -> Self {
        Self {
            identity,
            owning_window: None,
            index: None,
            pinned: false,
            is_placeholder: false,
            window_closing: false,
            values: Map::new(),
        }
    }

    pub fn identity(&self) -> SurfaceId {
        self.identity
    }

    /// Owning window id, or -1 when unattached
    pub fn window_id(&self) -> i32 {
        self.owning_window.map(WindowId::get).unwrap_or(-1)
    }

    pub fn owning_window(&self) -> Option<WindowId> {
        self.owning_window
    }

    /// Strip position; `None` is the no-tab sentinel
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }

    pub fn is_window_closing(&self) -> bool {
        self.window_closing
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Clear the deferred-close flag, returning its previous value
    pub(crate) fn take_window_closing(&mut self) -> bool {
        std::mem::take(&mut self.window_closing)
    }

    pub(crate) fn merge_values(&mut self, values: Map<String, Value>) {
        self.values.extend(values);
    }

    pub fn pinned_slot_state(&self) -> Option<PinnedSlotState> {
        if !self.pinned {
            None
        } else if self.is_placeholder {
            Some(PinnedSlotState::PlaceholderArmed)
        } else {
            Some(PinnedSlotState::Attached)
        }
    }
}
