//! Window close requests, window removal and activation

use super::TabHost;
use crate::surface::SurfaceId;
use crate::window::WindowId;

/// Result of a window close request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// A pinned tab vetoed the close; the window was hidden instead
    Hidden,
    /// The window is gone and its surfaces are ownerless
    Closed { orphaned: Vec<SurfaceId> },
    NotFound,
}

impl TabHost {
    /// Ask to close `window`. Every record bound to it gets a say first.
    pub fn request_window_close(&mut self, window: WindowId) -> CloseOutcome {
        if !self.windows.contains(window) {
            return CloseOutcome::NotFound;
        }

        let mut vetoed = false;
        for id in self.observers.subscribers(window) {
            vetoed |= self.will_close_window(id);
        }

        if !vetoed {
            return self.remove_window(window);
        }

        if let Some(w) = self.windows.get_mut(window) {
            w.hide();
        }
        let handed_over = self.windows.deactivate(window);
        log::info!("{} hidden: a pinned tab keeps it alive", window);
        if let Some(next) = handed_over {
            self.notify_last_active(next);
        }
        CloseOutcome::Hidden
    }

    /// Returns true if `id` objects to its window closing
    fn will_close_window(&mut self, id: SurfaceId) -> bool {
        let open_windows = self.windows.len();
        let Some(record) = self.records.get_mut(&id) else {
            return false;
        };
        record.window_closing = false;
        self.config.veto_pinned_window_close
            && record.owning_window.is_some()
            && record.pinned
            && !record.is_placeholder
            && !self.shutting_down
            && open_windows > 1
    }

    fn remove_window(&mut self, window: WindowId) -> CloseOutcome {
        let last_active = self.windows.last_active();
        let Some(removed) = self.windows.remove(window) else {
            return CloseOutcome::NotFound;
        };
        let orphaned: Vec<SurfaceId> = removed.tab_strip().surfaces().collect();
        for id in &orphaned {
            if let Some(surface) = self.surfaces.get_mut(id) {
                surface.detach_guest();
                surface.was_hidden();
            }
        }
        self.observers.remove_window(window);
        log::info!("{} closed, {} tab(s) orphaned", window, orphaned.len());

        for id in self.observers.window_list_observers() {
            self.on_window_removed(id, window);
        }

        let now_active = self.windows.last_active();
        if now_active != last_active {
            if let Some(next) = now_active {
                self.notify_last_active(next);
            }
        }
        CloseOutcome::Closed { orphaned }
    }

    fn on_window_removed(&mut self, id: SurfaceId, window: WindowId) {
        self.maybe_request_window_close(id);
        if self
            .records
            .get(&id)
            .is_some_and(|r| r.owning_window == Some(window))
        {
            self.unbind(id);
        }
    }

    /// Re-issue a close that `id` deferred
    pub(crate) fn maybe_request_window_close(&mut self, id: SurfaceId) {
        let Some(record) = self.records.get(&id) else {
            return;
        };
        if !record.window_closing {
            return;
        }
        let Some(owner) = record.owning_window else {
            return;
        };
        if self.request_window_close(owner) == CloseOutcome::NotFound {
            if let Some(record) = self.records.get_mut(&id) {
                record.window_closing = false;
            }
        }
    }

    /// Hold back a close of `id`'s window until its next attach,
    /// activation or window removal
    pub fn defer_window_close(&mut self, id: SurfaceId) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.window_closing = true;
                true
            }
            None => false,
        }
    }

    /// Final shutdown: pinned tabs no longer keep windows open
    pub fn begin_shutdown(&mut self) {
        if !self.shutting_down {
            log::info!("session shutting down");
        }
        self.shutting_down = true;
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// Make `window` the most recently active window
    pub fn set_last_active_window(&mut self, window: WindowId) -> bool {
        if !self.windows.set_last_active(window) {
            return false;
        }
        self.notify_last_active(window);
        true
    }

    /// Show a hidden window again and activate it
    pub fn show_window(&mut self, window: WindowId) -> bool {
        match self.windows.get_mut(window) {
            Some(w) => w.show(),
            None => return false,
        }
        self.set_last_active_window(window)
    }

    fn notify_last_active(&mut self, window: WindowId) {
        log::debug!("{} is now the last active window", window);
        for id in self.observers.window_list_observers() {
            self.maybe_request_window_close(id);
            self.maybe_attach_or_create_pinned_tab(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CloseOutcome;
    use crate::host::{HostConfig, TabHost};
    use crate::surface::SurfaceParams;
    use crate::tab::PinnedSlotState;
    use crate::window::WindowId;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_close_unknown_window() {
        let mut host = TabHost::new();
        assert_eq!(
            host.request_window_close(WindowId::new(42)),
            CloseOutcome::NotFound
        );
    }

    #[test]
    fn test_pinned_tab_vetoes_close() {
        let mut host = TabHost::new();
        let first = host.open_window();
        let second = host.open_window();
        let id = host
            .create_tab(SurfaceParams::in_window(first).pinned())
            .unwrap();
        host.set_last_active_window(first);
        assert_eq!(
            host.record(id).unwrap().pinned_slot_state(),
            Some(PinnedSlotState::Attached)
        );

        assert_eq!(host.request_window_close(first), CloseOutcome::Hidden);
        assert_eq!(host.window_count(), 2);
        assert!(!host.window(first).unwrap().is_visible());
        assert_eq!(host.last_active_window(), Some(second));
        assert_eq!(host.index_of(first, id), Some(0));

        assert!(host.show_window(first));
        assert!(host.window(first).unwrap().is_visible());
        assert_eq!(host.last_active_window(), Some(first));
    }

    #[test]
    fn test_close_without_veto_orphans_tabs() {
        let config = HostConfig::default().with_veto_pinned_window_close(false);
        let mut host = TabHost::with_config(config);
        let first = host.open_window();
        let second = host.open_window();
        let id = host
            .create_tab(SurfaceParams::in_window(first).pinned())
            .unwrap();
        host.set_last_active_window(first);

        assert_eq!(
            host.request_window_close(first),
            CloseOutcome::Closed { orphaned: vec![id] }
        );
        assert_eq!(host.window_count(), 1);
        assert_eq!(host.last_active_window(), Some(second));
        assert_eq!(host.record(id).unwrap().owning_window(), None);
        assert!(!host.surface(id).unwrap().is_attached());
    }

    #[test]
    fn test_shutdown_closes_pinned_windows() {
        let mut host = TabHost::new();
        let first = host.open_window();
        host.open_window();
        let id = host
            .create_tab(SurfaceParams::in_window(first).pinned())
            .unwrap();
        host.set_last_active_window(first);

        host.begin_shutdown();
        assert!(host.is_shutting_down());
        assert!(matches!(
            host.request_window_close(first),
            CloseOutcome::Closed { .. }
        ));
        assert_eq!(host.record(id).unwrap().window_id(), -1);
    }

    #[test]
    fn test_armed_slot_waits_for_its_window() {
        let mut host = TabHost::new();
        let first = host.open_window();
        let second = host.open_window();
        let id = host
            .create_tab(SurfaceParams::in_window(first).pinned())
            .unwrap();
        host.run_until_idle();
        assert_eq!(
            host.record(id).unwrap().pinned_slot_state(),
            Some(PinnedSlotState::PlaceholderArmed)
        );

        host.set_last_active_window(second);
        assert_eq!(
            host.record(id).unwrap().pinned_slot_state(),
            Some(PinnedSlotState::PlaceholderArmed)
        );
        assert_eq!(host.surface(id).unwrap().load_count(), 0);

        host.set_last_active_window(first);
        assert_eq!(
            host.record(id).unwrap().pinned_slot_state(),
            Some(PinnedSlotState::Attached)
        );
        assert_eq!(host.surface(id).unwrap().load_count(), 1);
        assert!(host.surface(id).unwrap().has_user_gesture());
    }

    #[test]
    fn test_deferred_close_runs_after_attach() {
        let mut host = TabHost::new();
        let first = host.open_window();
        host.open_window();
        let id = host.create_tab(SurfaceParams::in_window(first)).unwrap();

        assert!(host.defer_window_close(id));
        assert!(host.guest_did_attach(id));
        assert_eq!(host.window_count(), 1);
        assert!(host.window(first).is_none());
        assert!(!host.record(id).unwrap().is_window_closing());
    }

    #[test]
    fn test_close_flag_moves_to_placeholder_once() {
        let mut host = TabHost::new();
        let first = host.open_window();
        host.open_window();
        let id = host.create_tab(SurfaceParams::in_window(first)).unwrap();
        host.defer_window_close(id);

        let placeholder = host.detach_guest(id).unwrap().unwrap();
        assert!(!host.record(id).unwrap().is_window_closing());
        assert!(host.record(placeholder).unwrap().is_window_closing());

        host.run_pending_tasks();
        assert_eq!(host.window_count(), 1);
        assert!(!host.record(placeholder).unwrap().is_window_closing());
    }

    #[test]
    fn test_strip_listeners_dropped_with_window() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        use crate::window::{TabStrip, TabStripEvent};

        let config = HostConfig::default().with_veto_pinned_window_close(false);
        let mut host = TabHost::with_config(config);
        let window = host.open_window();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        host.add_strip_listener(
            window,
            Arc::new(move |_: &TabStripEvent, _: &TabStrip| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        host.create_tab(SurfaceParams::in_window(window)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        host.request_window_close(window);
        assert_eq!(Arc::strong_count(&calls), 1);
    }
}
