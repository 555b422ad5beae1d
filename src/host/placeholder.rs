//! Placeholder substitution
//!
//! A placeholder is an inert surface that holds a tab slot while the real
//! content is away: moving to another window, discarded, or a pinned slot
//! waiting for its window to become active. Substitution copies navigation
//! state and the slot's role into the placeholder and swaps it in with a
//! single strip replace.

use super::TabHost;
use crate::surface::SurfaceId;
use crate::utils::{Result, TabHostError};

impl TabHost {
    /// Pull an attached surface out of its slot, leaving a placeholder
    /// behind. Returns the placeholder, or `None` if the guest was not
    /// attached. The source ends up ownerless.
    pub fn detach_guest(&mut self, id: SurfaceId) -> Result<Option<SurfaceId>> {
        if !self.surfaces.get(&id).is_some_and(|s| s.is_attached()) {
            return Ok(None);
        }
        if self.strip_position(id).is_none() {
            debug_assert!(false, "attached guest {} has no tab slot", id);
            log::warn!("attached guest {} has no tab slot", id);
            return Ok(None);
        }
        self.substitute_placeholder(id, false)
    }

    /// Discard an attached tab: a discarded placeholder keeps the slot and
    /// history, the source surface is destroyed on the next tick
    pub fn discard(&mut self, id: SurfaceId) -> Result<bool> {
        let eligible = self
            .surfaces
            .get(&id)
            .is_some_and(|s| s.is_attached() && !s.is_discarded())
            && self.records.get(&id).is_some_and(|r| !r.is_placeholder)
            && self.strip_position(id).is_some();
        if !eligible {
            return Ok(false);
        }
        if self.substitute_placeholder(id, true)?.is_none() {
            return Ok(false);
        }
        self.tasks.post_destroy(id);
        log::debug!("{} discarded", id);
        Ok(true)
    }

    fn substitute_placeholder(&mut self, source: SurfaceId, discarded: bool) -> Result<Option<SurfaceId>> {
        let Some((window, strip_index)) = self.strip_position(source) else {
            return Ok(None);
        };
        if !self.surfaces.contains_key(&source) {
            return Ok(None);
        }

        let id = self.allocate_surface_id();
        let Some(source_surface) = self.surfaces.get(&source) else {
            return Ok(None);
        };
        let mut placeholder = self.factory.create_placeholder(id, source_surface)?;
        if placeholder.id() != id {
            return Err(TabHostError::SurfaceCreation(format!(
                "placeholder for {} built as {}, expected {}",
                source,
                placeholder.id(),
                id
            )));
        }
        placeholder
            .navigation_mut()
            .copy_state_from(source_surface.navigation());
        placeholder.set_discarded(discarded);
        self.adopt_surface(placeholder);

        let (index, pinned, window_closing) = match self.records.get_mut(&source) {
            Some(record) => (record.index, record.pinned, record.take_window_closing()),
            None => (None, false, false),
        };
        if let Some(record) = self.records.get_mut(&id) {
            record.index = index;
            record.pinned = pinned;
            record.window_closing = window_closing;
        }
        self.set_placeholder(id, true);

        if self.replace_tab_at(window, strip_index, id).is_none() {
            debug_assert!(false, "slot {} of {} rejected placeholder {}", strip_index, window, id);
            log::warn!("slot {} of {} rejected placeholder {}", strip_index, window, id);
            if let Some(record) = self.records.get_mut(&source) {
                record.window_closing = window_closing;
            }
            self.destroy_surface(id);
            return Ok(None);
        }
        log::debug!("placeholder {} stands in for {} in {}", id, source, window);
        Ok(Some(id))
    }

    pub(crate) fn set_placeholder(&mut self, id: SurfaceId, is_placeholder: bool) {
        if let Some(record) = self.records.get_mut(&id) {
            record.is_placeholder = is_placeholder;
        }
        if !is_placeholder {
            if let Some(surface) = self.surfaces.get_mut(&id) {
                surface.set_can_run_detached(true);
            }
        }
    }

    /// Attach-finished notification from the embedder. May arrive more
    /// than once for the same attach.
    pub fn guest_did_attach(&mut self, id: SurfaceId) -> bool {
        if !self.surfaces.get(&id).is_some_and(|s| s.is_attached()) {
            return false;
        }
        self.did_attach(id);
        true
    }

    /// Post-attach hook
    pub(crate) fn did_attach(&mut self, id: SurfaceId) {
        self.maybe_request_window_close(id);

        let Some(record) = self.records.get(&id) else {
            return;
        };
        let (is_placeholder, pinned) = (record.is_placeholder, record.pinned);
        if !is_placeholder {
            if pinned {
                self.maybe_attach_or_create_pinned_tab(id);
            }
            return;
        }

        let discarded = self.surfaces.get(&id).is_some_and(|s| s.is_discarded());
        if !pinned && !discarded {
            // Stand-in for a tab move; its slot has no further use.
            if self.tasks.post_destroy(id) {
                log::debug!("transient placeholder {} scheduled for destruction", id);
            }
            return;
        }

        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.set_can_run_detached(false);
        }
        self.maybe_attach_or_create_pinned_tab(id);
    }

    /// Turn an armed pinned slot back into real content when its window is
    /// the most recently active one. Returns true if it fired.
    pub(crate) fn maybe_attach_or_create_pinned_tab(&mut self, id: SurfaceId) -> bool {
        let Some(record) = self.records.get(&id) else {
            return false;
        };
        let attached = self.surfaces.get(&id).is_some_and(|s| s.is_attached());
        if record.window_closing
            || !record.pinned
            || !record.is_placeholder
            || !attached
            || record.owning_window.is_none()
            || record.owning_window != self.windows.last_active()
        {
            return false;
        }

        // Pinned tabs are never transferred between windows; the slot
        // reloads its own history instead.
        self.set_placeholder(id, false);
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.user_gesture_done();
            surface.was_shown();
            surface.set_discarded(false);
            surface.load();
        }
        log::debug!("pinned tab {} reattached", id);
        true
    }
}
