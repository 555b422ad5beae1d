//! Browsing surfaces and their identities
//!
//! A surface is the content-hosting unit behind a tab. The host never keeps
//! raw references to surfaces across events; everything is addressed by
//! [`SurfaceId`] and resolved on use.

mod factory;
mod navigation;
mod registry;

use std::fmt;

pub use factory::{InProcessSurfaceFactory, SurfaceFactory, SurfaceParams};
#[cfg(test)]
pub use factory::MockSurfaceFactory;
pub use navigation::{NavigationController, NavigationEntry};
pub use registry::SurfaceRegistry;

/// Stable per-surface identity, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(i32);

impl SurfaceId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Process/routing pair currently serving a surface's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderChannel {
    pub process_id: i32,
    pub routing_id: i32,
}

impl RenderChannel {
    pub fn new(process_id: i32, routing_id: i32) -> Self {
        Self {
            process_id,
            routing_id,
        }
    }
}

impl fmt::Display for RenderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.process_id, self.routing_id)
    }
}

/// Embedding state of a surface inside a host window slot
#[derive(Debug, Clone)]
pub struct GuestState {
    attached: bool,
    can_run_detached: bool,
    attach_params: serde_json::Map<String, serde_json::Value>,
}

impl Default for GuestState {
    fn default() -> Self {
        Self {
            attached: false,
            can_run_detached: true,
            attach_params: serde_json::Map::new(),
        }
    }
}

impl GuestState {
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether background script may keep running while detached
    pub fn can_run_detached(&self) -> bool {
        self.can_run_detached
    }

    pub fn attach_params(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.attach_params
    }
}

/// A browsing surface: one tab's content area
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    partition: String,
    off_the_record: bool,
    channel: RenderChannel,
    navigation: NavigationController,
    guest: GuestState,
    visible: bool,
    discarded: bool,
    auto_discardable: bool,
    loading: bool,
    load_count: u32,
    user_gesture_done: bool,
}

impl Surface {
    /// Create a detached, hidden surface in the given browsing context group
    pub fn new(id: SurfaceId, partition: impl Into<String>, channel: RenderChannel) -> Self {
        Self {
            id,
            partition: partition.into(),
            off_the_record: false,
            channel,
            navigation: NavigationController::new(),
            guest: GuestState::default(),
            visible: false,
            discarded: false,
            auto_discardable: true,
            loading: false,
            load_count: 0,
            user_gesture_done: false,
        }
    }

    pub fn with_off_the_record(mut self, off_the_record: bool) -> Self {
        self.off_the_record = off_the_record;
        self
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Browsing context group this surface belongs to
    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn is_off_the_record(&self) -> bool {
        self.off_the_record
    }

    pub fn channel(&self) -> RenderChannel {
        self.channel
    }

    pub(crate) fn set_channel(&mut self, channel: RenderChannel) {
        self.channel = channel;
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationController {
        &mut self.navigation
    }

    /// URL of the committed entry, if any
    pub fn url(&self) -> Option<&url::Url> {
        self.navigation.last_committed_entry().map(|e| e.url())
    }

    pub fn title(&self) -> &str {
        self.navigation
            .last_committed_entry()
            .map(|e| e.title())
            .unwrap_or("")
    }

    pub fn guest(&self) -> &GuestState {
        &self.guest
    }

    pub fn is_attached(&self) -> bool {
        self.guest.attached
    }

    pub(crate) fn attach_guest(&mut self) {
        self.guest.attached = true;
    }

    pub(crate) fn detach_guest(&mut self) {
        self.guest.attached = false;
    }

    pub(crate) fn set_can_run_detached(&mut self, can_run: bool) {
        self.guest.can_run_detached = can_run;
    }

    pub(crate) fn set_attach_params(&mut self, params: serde_json::Map<String, serde_json::Value>) {
        self.guest.attach_params = params;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn was_shown(&mut self) {
        self.visible = true;
    }

    pub fn was_hidden(&mut self) {
        self.visible = false;
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    pub(crate) fn set_discarded(&mut self, discarded: bool) {
        self.discarded = discarded;
    }

    pub fn is_auto_discardable(&self) -> bool {
        self.auto_discardable
    }

    pub fn set_auto_discardable(&mut self, auto_discardable: bool) {
        self.auto_discardable = auto_discardable;
    }

    /// Start loading the committed entry
    pub fn load(&mut self) {
        self.loading = true;
        self.load_count += 1;
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// How many times a load was triggered on this surface
    pub fn load_count(&self) -> u32 {
        self.load_count
    }

    /// Mark the surface interactive, as if the user had acted on it
    pub fn user_gesture_done(&mut self) {
        self.user_gesture_done = true;
    }

    pub fn has_user_gesture(&self) -> bool {
        self.user_gesture_done
    }
}
