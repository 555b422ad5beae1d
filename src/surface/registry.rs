//! Surface identity registry
//!
//! Maps a tab's stable identity to the render channel currently serving its
//! content. Other subsystems resolve "the surface for logical tab N" through
//! this map instead of holding a reference across process swaps.

use std::collections::HashMap;

use super::{RenderChannel, SurfaceId};

/// Identity -> (process, routing) map owned by a single host session
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    entries: HashMap<SurfaceId, RenderChannel>,
}

impl SurfaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the channel for `id`
    pub fn register(&mut self, id: SurfaceId, process_id: i32, routing_id: i32) {
        let channel = RenderChannel::new(process_id, routing_id);
        if let Some(stale) = self.entries.insert(id, channel) {
            if stale != channel {
                log::debug!("surface {} moved from {} to {}", id, stale, channel);
            }
        }
    }

    /// Resolve the channel currently serving `id`
    pub fn lookup(&self, id: SurfaceId) -> Option<RenderChannel> {
        self.entries.get(&id).copied()
    }

    /// Forget `id`; no-op when absent
    pub fn unregister(&mut self, id: SurfaceId) {
        self.entries.remove(&id);
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
