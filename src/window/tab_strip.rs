//! Ordered tab list of a single window

use crate::surface::SurfaceId;

/// Structural change published after a strip mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStripEvent {
    Inserted {
        surface: SurfaceId,
        index: usize,
    },
    Detached {
        surface: SurfaceId,
        index: usize,
    },
    /// `old` was swapped out for `new` in a single step
    Replaced {
        old: SurfaceId,
        new: SurfaceId,
        index: usize,
    },
    PinnedStateChanged {
        surface: SurfaceId,
        index: usize,
        pinned: bool,
    },
    Activated {
        surface: SurfaceId,
        index: usize,
    },
}

/// One slot of the strip. The pinned bit belongs to the slot, not to
/// whichever surface currently occupies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSlot {
    pub surface: SurfaceId,
    pub pinned: bool,
}

#[derive(Debug, Default)]
pub struct TabStrip {
    slots: Vec<TabSlot>,
    active: Option<usize>,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn surface_at(&self, index: usize) -> Option<SurfaceId> {
        self.slots.get(index).map(|s| s.surface)
    }

    pub fn index_of(&self, surface: SurfaceId) -> Option<usize> {
        self.slots.iter().position(|s| s.surface == surface)
    }

    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.index_of(surface).is_some()
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.pinned)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_surface(&self) -> Option<SurfaceId> {
        self.active.and_then(|i| self.surface_at(i))
    }

    pub fn surfaces(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.slots.iter().map(|s| s.surface)
    }

    pub(crate) fn append(&mut self, surface: SurfaceId) -> TabStripEvent {
        self.slots.push(TabSlot {
            surface,
            pinned: false,
        });
        TabStripEvent::Inserted {
            surface,
            index: self.slots.len() - 1,
        }
    }

    pub(crate) fn detach_at(&mut self, index: usize) -> Option<TabStripEvent> {
        if index >= self.slots.len() {
            return None;
        }
        let slot = self.slots.remove(index);
        self.active = match self.active {
            Some(active) if active == index => {
                if self.slots.is_empty() {
                    None
                } else {
                    Some(index.min(self.slots.len() - 1))
                }
            }
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Some(TabStripEvent::Detached {
            surface: slot.surface,
            index,
        })
    }

    /// Swap the occupant of `index`. The slot is never observed empty.
    pub(crate) fn replace_at(&mut self, index: usize, surface: SurfaceId) -> Option<TabStripEvent> {
        let slot = self.slots.get_mut(index)?;
        let old = std::mem::replace(&mut slot.surface, surface);
        Some(TabStripEvent::Replaced {
            old,
            new: surface,
            index,
        })
    }

    pub(crate) fn set_pinned(&mut self, index: usize, pinned: bool) -> Option<TabStripEvent> {
        let slot = self.slots.get_mut(index)?;
        if slot.pinned == pinned {
            return None;
        }
        slot.pinned = pinned;
        Some(TabStripEvent::PinnedStateChanged {
            surface: slot.surface,
            index,
            pinned,
        })
    }

    pub(crate) fn activate_at(&mut self, index: usize) -> Option<TabStripEvent> {
        let surface = self.surface_at(index)?;
        self.active = Some(index);
        Some(TabStripEvent::Activated { surface, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_of(ids: &[i32]) -> TabStrip {
        let mut strip = TabStrip::new();
        for &id in ids {
            strip.append(SurfaceId::new(id));
        }
        strip
    }

    #[test]
    fn test_append_and_index_of() {
        let strip = strip_of(&[1, 2, 3]);
        assert_eq!(strip.count(), 3);
        assert_eq!(strip.index_of(SurfaceId::new(3)), Some(2));
        assert_eq!(strip.index_of(SurfaceId::new(9)), None);
    }

    #[test]
    fn test_replace_keeps_slot_pinned() {
        let mut strip = strip_of(&[1, 2]);
        strip.set_pinned(0, true);
        let event = strip.replace_at(0, SurfaceId::new(5)).unwrap();
        assert_eq!(
            event,
            TabStripEvent::Replaced {
                old: SurfaceId::new(1),
                new: SurfaceId::new(5),
                index: 0
            }
        );
        assert!(strip.is_pinned(0));
        assert_eq!(strip.surface_at(0), Some(SurfaceId::new(5)));
        assert!(strip.replace_at(7, SurfaceId::new(6)).is_none());
    }

    #[test]
    fn test_detach_shifts_active() {
        let mut strip = strip_of(&[1, 2, 3]);
        strip.activate_at(2);
        strip.detach_at(0);
        assert_eq!(strip.active_surface(), Some(SurfaceId::new(3)));
        strip.detach_at(1);
        assert_eq!(strip.active_surface(), Some(SurfaceId::new(2)));
        strip.detach_at(0);
        assert_eq!(strip.active_index(), None);
    }

    #[test]
    fn test_set_pinned_reports_only_changes() {
        let mut strip = strip_of(&[1]);
        assert!(strip.set_pinned(0, false).is_none());
        assert!(strip.set_pinned(0, true).is_some());
        assert!(strip.set_pinned(0, true).is_none());
    }
}
