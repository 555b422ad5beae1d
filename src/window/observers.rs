//! Publish/subscribe registry keyed by window identity
//!
//! Tab records subscribe to the strip of the window that owns them and to
//! the window list as a whole. Unsubscribing is explicit: removing a window
//! drops every subscription and listener attached to it.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use super::{TabStrip, TabStripEvent, WindowId};
use crate::surface::SurfaceId;

/// External strip listener. Runs after the mutation, with the strip as it
/// is once the change has been applied.
pub type StripListener = Arc<dyn Fn(&TabStripEvent, &TabStrip) + Send + Sync>;

#[derive(Default)]
pub struct WindowObservers {
    strip_subscribers: HashMap<WindowId, Vec<SurfaceId>>,
    listeners: HashMap<WindowId, Vec<StripListener>>,
    window_list: BTreeSet<SurfaceId>,
}

impl WindowObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `surface` to `window`'s strip. Returns false if it
    /// already was.
    pub fn subscribe(&mut self, window: WindowId, surface: SurfaceId) -> bool {
        debug_assert!(
            self.window_of(surface).is_none_or(|w| w == window),
            "surface {} observed by two windows",
            surface
        );
        let subscribers = self.strip_subscribers.entry(window).or_default();
        if subscribers.contains(&surface) {
            return false;
        }
        subscribers.push(surface);
        true
    }

    pub fn unsubscribe(&mut self, window: WindowId, surface: SurfaceId) -> bool {
        match self.strip_subscribers.get_mut(&window) {
            Some(subscribers) => {
                let before = subscribers.len();
                subscribers.retain(|s| *s != surface);
                before != subscribers.len()
            }
            None => false,
        }
    }

    /// Snapshot of the records subscribed to `window`, in subscription order
    pub fn subscribers(&self, window: WindowId) -> Vec<SurfaceId> {
        self.strip_subscribers
            .get(&window)
            .cloned()
            .unwrap_or_default()
    }

    pub fn window_of(&self, surface: SurfaceId) -> Option<WindowId> {
        self.strip_subscribers
            .iter()
            .find(|(_, subscribers)| subscribers.contains(&surface))
            .map(|(window, _)| *window)
    }

    pub fn add_listener(&mut self, window: WindowId, listener: StripListener) {
        self.listeners.entry(window).or_default().push(listener);
    }

    pub fn listeners(&self, window: WindowId) -> Vec<StripListener> {
        self.listeners.get(&window).cloned().unwrap_or_default()
    }

    pub fn observe_window_list(&mut self, surface: SurfaceId) {
        self.window_list.insert(surface);
    }

    /// Snapshot of every window-list observer, in identity order
    pub fn window_list_observers(&self) -> Vec<SurfaceId> {
        self.window_list.iter().copied().collect()
    }

    /// Drop everything attached to `window`; returns the former subscribers
    pub fn remove_window(&mut self, window: WindowId) -> Vec<SurfaceId> {
        self.listeners.remove(&window);
        self.strip_subscribers.remove(&window).unwrap_or_default()
    }

    /// Drop every subscription held by `surface`
    pub fn forget_surface(&mut self, surface: SurfaceId) {
        for subscribers in self.strip_subscribers.values_mut() {
            subscribers.retain(|s| *s != surface);
        }
        self.window_list.remove(&surface);
    }
}

impl fmt::Debug for WindowObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowObservers")
            .field("strip_subscribers", &self.strip_subscribers)
            .field(
                "listeners",
                &self.listeners.values().map(Vec::len).sum::<usize>(),
            )
            .field("window_list", &self.window_list)
            .finish()
    }
}
