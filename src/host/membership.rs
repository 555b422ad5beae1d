//! Window membership: which window a tab record belongs to

use super::TabHost;
use super::tasks::DeferredTask;
use crate::surface::SurfaceId;
use crate::window::{TabStripEvent, WindowId};

impl TabHost {
    /// Subscribe `id`'s record to `window`. No-op if already bound there;
    /// a record bound elsewhere is unbound first.
    pub(crate) fn bind(&mut self, id: SurfaceId, window: WindowId) {
        let Some(current) = self.records.get(&id).map(|r| r.owning_window) else {
            return;
        };
        if current == Some(window) {
            return;
        }
        if current.is_some() {
            self.unbind(id);
        }
        if !self.windows.contains(window) {
            log::warn!("cannot bind {} to missing {}", id, window);
            return;
        }

        self.observers.subscribe(window, id);
        let index = self.index_of(window, id);
        if let Some(record) = self.records.get_mut(&id) {
            record.owning_window = Some(window);
            record.index = index;
        }
    }

    /// Stop observing the owning window and forget the position
    pub(crate) fn unbind(&mut self, id: SurfaceId) {
        let Some(record) = self.records.get_mut(&id) else {
            return;
        };
        record.index = None;
        if let Some(window) = record.owning_window.take() {
            self.observers.unsubscribe(window, id);
        }
    }

    pub(crate) fn on_tab_strip_event(&mut self, id: SurfaceId, window: WindowId, event: &TabStripEvent) {
        if !self.records.contains_key(&id) {
            return;
        }
        match *event {
            TabStripEvent::Detached { surface, .. } if surface == id => self.unbind(id),
            TabStripEvent::Replaced { old, new, .. } if old == id => {
                self.tab_replaced_at(old, new, window)
            }
            TabStripEvent::PinnedStateChanged {
                surface, pinned, ..
            } if surface == id => self.tab_pinned_state_changed(id, pinned),
            _ => {}
        }
    }

    /// `old` was swapped out of its slot for `new`: hand over the slot's
    /// role and move the guest embedding across
    fn tab_replaced_at(&mut self, old: SurfaceId, new: SurfaceId, window: WindowId) {
        let Some((index, pinned)) = self.records.get(&old).map(|r| (r.index, r.pinned)) else {
            return;
        };
        match self.records.get_mut(&new) {
            Some(record) => {
                record.index = index;
                record.pinned = pinned;
            }
            None => {
                log::warn!("replacement {} has no tab record", new);
                return;
            }
        }

        self.unbind(old);
        self.bind(new, window);

        let attach_params = match self.surfaces.get_mut(&old) {
            Some(surface) => {
                surface.was_hidden();
                surface.detach_guest();
                surface.guest().attach_params().clone()
            }
            None => Default::default(),
        };
        if let Some(surface) = self.surfaces.get_mut(&new) {
            surface.set_attach_params(attach_params);
        }
        log::debug!("tab slot of {} now served by {}", old, new);
        self.begin_guest_attach(new);
    }

    /// Start embedding `id`; the post-attach hook runs on the next tick
    pub(crate) fn begin_guest_attach(&mut self, id: SurfaceId) {
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.attach_guest();
            self.tasks.post(DeferredTask::DidAttach(id));
        }
    }

    fn tab_pinned_state_changed(&mut self, id: SurfaceId, pinned: bool) {
        let Some(record) = self.records.get_mut(&id) else {
            return;
        };
        if record.pinned != pinned {
            record.pinned = pinned;
            // Pinning arms the slot; the real content is recreated once the
            // window is the active one.
            self.set_placeholder(id, pinned);
        }
        self.maybe_attach_or_create_pinned_tab(id);
    }

    /// Append `id` to the end of `window`'s strip and embed it there. A
    /// pinned record gets a pinned slot.
    pub fn append_tab(&mut self, window: WindowId, id: SurfaceId) -> bool {
        if !self.windows.contains(window) || !self.surfaces.contains_key(&id) {
            return false;
        }
        if let Some((other, _)) = self.windows.position_of(id) {
            log::warn!("{} is already in {}", id, other);
            return false;
        }

        self.bind(id, window);
        let event = match self.windows.get_mut(window) {
            Some(w) => w.tab_strip_mut().append(id),
            None => return false,
        };
        self.publish_strip_event(window, event);

        if self.surfaces.get(&id).is_some_and(|s| !s.is_attached()) {
            self.begin_guest_attach(id);
        }
        if self.records.get(&id).is_some_and(|r| r.pinned) {
            if let Some(index) = self.index_of(window, id) {
                self.set_tab_pinned(window, index, true);
            }
        }
        true
    }

    /// Reassign `id` to `target`, or make it ownerless with `None`
    pub fn move_to_window(&mut self, id: SurfaceId, target: Option<WindowId>) -> bool {
        let Some(current) = self.records.get(&id).map(|r| r.owning_window) else {
            return false;
        };
        if current == target {
            return false;
        }

        if let Some(window) = current {
            if let Some((_, index)) = self.strip_position(id) {
                self.detach_tab_at(window, index);
            }
            self.unbind(id);
        }

        match target {
            Some(window) => self.append_tab(window, id),
            None => true,
        }
    }

    /// Strip index of the tab whose record has logical `index` in
    /// `window_id`
    pub fn tab_strip_index(&self, window_id: WindowId, index: usize) -> Option<usize> {
        self.records
            .values()
            .find(|r| r.index == Some(index) && r.owning_window == Some(window_id))
            .and_then(|r| self.strip_position(r.identity()))
            .map(|(_, strip_index)| strip_index)
    }

    /// Move a detached surface into the slot currently holding logical
    /// `index` of `window_id`
    pub fn attach_guest(&mut self, id: SurfaceId, window_id: WindowId, index: usize) -> bool {
        let attached = self.surfaces.get(&id).is_some_and(|s| s.is_attached());
        debug_assert!(!attached, "guest {} is already attached", id);
        if attached {
            log::warn!("attach requested for already attached {}", id);
            return false;
        }
        if !self.windows.contains(window_id) {
            return false;
        }
        let Some(strip_index) = self.tab_strip_index(window_id, index) else {
            return false;
        };
        self.replace_tab_at(window_id, strip_index, id).is_some()
    }

    /// Show or hide a tab. Showing activates its slot and may complete a
    /// pinned slot.
    pub fn set_active(&mut self, id: SurfaceId, active: bool) -> bool {
        if !self.surfaces.contains_key(&id) {
            return false;
        }
        if active {
            if let Some((window, index)) = self.strip_position(id) {
                self.activate_tab_at(window, index);
            }
            if let Some(surface) = self.surfaces.get_mut(&id) {
                if !surface.is_discarded() {
                    surface.was_shown();
                }
            }
            self.maybe_attach_or_create_pinned_tab(id);
        } else if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.was_hidden();
        }
        true
    }

    /// Pin or unpin a tab, through its strip slot when it has one
    pub fn set_pinned(&mut self, id: SurfaceId, pinned: bool) -> bool {
        match self.records.get(&id) {
            Some(record) if record.pinned != pinned => {}
            _ => return false,
        }
        if let Some((window, index)) = self.strip_position(id) {
            if self.set_tab_pinned(window, index, pinned) {
                return true;
            }
        }
        self.tab_pinned_state_changed(id, pinned);
        true
    }
}
