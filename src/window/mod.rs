//! Top-level windows and their tab strips

mod observers;
mod tab_strip;

use std::fmt;

pub use observers::{StripListener, WindowObservers};
pub use tab_strip::{TabSlot, TabStrip, TabStripEvent};

use crate::surface::SurfaceId;

/// Window identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(i32);

impl WindowId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window {}", self.0)
    }
}

/// A top-level browser window
#[derive(Debug)]
pub struct Window {
    id: WindowId,
    strip: TabStrip,
    visible: bool,
    active: bool,
}

impl Window {
    pub fn new(id: WindowId) -> Self {
        Self {
            id,
            strip: TabStrip::new(),
            visible: true,
            active: false,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn tab_strip(&self) -> &TabStrip {
        &self.strip
    }

    /// Strip mutations go through the host so observers are notified
    pub(crate) fn tab_strip_mut(&mut self) -> &mut TabStrip {
        &mut self.strip
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn show(&mut self) {
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }
}

/// All open windows plus their activation order
#[derive(Debug, Default)]
pub struct WindowList {
    windows: Vec<Window>,
    /// Least recently active first
    activation_order: Vec<WindowId>,
}

impl WindowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, window: Window) {
        self.windows.push(window);
    }

    /// Remove a window. If it was the last active one, the next most
    /// recently active window takes over.
    pub(crate) fn remove(&mut self, id: WindowId) -> Option<Window> {
        let position = self.windows.iter().position(|w| w.id == id)?;
        self.activation_order.retain(|w| *w != id);
        let window = self.windows.remove(position);
        self.refresh_active_flags();
        Some(window)
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    pub fn last_active(&self) -> Option<WindowId> {
        self.activation_order.last().copied()
    }

    pub(crate) fn set_last_active(&mut self, id: WindowId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.activation_order.retain(|w| *w != id);
        self.activation_order.push(id);
        self.refresh_active_flags();
        true
    }

    /// Push `id` to the back of the activation order. Returns the new last
    /// active window if it changed.
    pub(crate) fn deactivate(&mut self, id: WindowId) -> Option<WindowId> {
        let before = self.last_active();
        if self.activation_order.contains(&id) {
            self.activation_order.retain(|w| *w != id);
            self.activation_order.insert(0, id);
        }
        if let Some(window) = self.get_mut(id) {
            window.active = false;
        }
        let after = self.last_active();
        if after != before && after != Some(id) {
            self.refresh_active_flags();
            after
        } else {
            None
        }
    }

    /// Window whose strip currently holds `surface`, with its strip index
    pub fn position_of(&self, surface: SurfaceId) -> Option<(WindowId, usize)> {
        self.windows
            .iter()
            .find_map(|w| w.strip.index_of(surface).map(|i| (w.id, i)))
    }

    fn refresh_active_flags(&mut self) {
        let last = self.last_active();
        for window in &mut self.windows {
            window.active = Some(window.id) == last;
        }
    }
}
