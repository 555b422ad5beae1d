//! The tab host: owner of every surface, tab record and window in a session
//!
//! All mutation happens on one control thread through `&mut TabHost`. Tab
//! strip and window list changes are applied first and then published to
//! the records subscribed to the affected window, so a record handler always
//! sees the post-change state.
//!
//! The behaviour is split across submodules:
//! - `membership`: binding records to windows and reacting to strip events
//! - `placeholder`: stand-in substitution, post-attach hook, pinned slots
//! - `close`: window close vetoes, window removal and activation
//! - `tasks`: the deferred task queue

mod close;
mod membership;
mod placeholder;
mod tasks;

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{Map, Value};

pub use close::CloseOutcome;
pub use tasks::{DeferredTask, SurfaceCallback, TaskPoster, TaskQueue};

use crate::surface::{
    InProcessSurfaceFactory, RenderChannel, Surface, SurfaceFactory, SurfaceId, SurfaceParams,
    SurfaceRegistry,
};
use crate::tab::{TabRecord, TabStatus, TabValue};
use crate::utils::Result;
use crate::window::{StripListener, TabStripEvent, Window, WindowId, WindowList, WindowObservers};

/// Upper bound on ticks run by [`TabHost::run_until_idle`]
const MAX_IDLE_TICKS: usize = 64;

/// Host configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Hide instead of closing a window whose pinned tab would be lost
    pub veto_pinned_window_close: bool,
    pub first_surface_id: i32,
    pub first_window_id: i32,
    /// Browsing context group for surfaces created without one
    pub default_partition: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            veto_pinned_window_close: true,
            first_surface_id: 1,
            first_window_id: 1,
            default_partition: "persist:default".to_string(),
        }
    }
}

impl HostConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_veto_pinned_window_close(mut self, veto: bool) -> Self {
        self.veto_pinned_window_close = veto;
        self
    }

    pub fn with_default_partition(mut self, partition: impl Into<String>) -> Self {
        self.default_partition = partition.into();
        self
    }
}

pub struct TabHost {
    config: HostConfig,
    factory: Box<dyn SurfaceFactory>,
    registry: SurfaceRegistry,
    surfaces: HashMap<SurfaceId, Surface>,
    records: BTreeMap<SurfaceId, TabRecord>,
    windows: WindowList,
    observers: WindowObservers,
    tasks: TaskQueue,
    next_surface_id: i32,
    next_window_id: i32,
    shutting_down: bool,
}

impl TabHost {
    /// Create a host with the in-process surface factory
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Self {
        let factory = InProcessSurfaceFactory::new(config.default_partition.clone());
        Self::with_factory(config, Box::new(factory))
    }

    pub fn with_factory(config: HostConfig, factory: Box<dyn SurfaceFactory>) -> Self {
        Self {
            next_surface_id: config.first_surface_id,
            next_window_id: config.first_window_id,
            config,
            factory,
            registry: SurfaceRegistry::new(),
            surfaces: HashMap::new(),
            records: BTreeMap::new(),
            windows: WindowList::new(),
            observers: WindowObservers::new(),
            tasks: TaskQueue::new(),
            shutting_down: false,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    fn allocate_surface_id(&mut self) -> SurfaceId {
        let id = SurfaceId::new(self.next_surface_id);
        self.next_surface_id += 1;
        id
    }

    // --- surfaces -------------------------------------------------------

    /// Create a tab surface, optionally attached to `params.window`
    pub fn create_tab(&mut self, params: SurfaceParams) -> Result<SurfaceId> {
        let id = self.allocate_surface_id();
        let mut surface = self.factory.create_surface(id, &params)?;
        if let Some(url) = &params.url {
            surface.navigation_mut().navigate(url)?;
        }
        self.adopt_surface(surface);

        if let Some(window) = params.window {
            self.move_to_window(id, Some(window));
        }
        if params.pinned {
            self.set_pinned(id, true);
        }
        if params.active {
            self.set_active(id, true);
        }
        Ok(id)
    }

    /// Register a freshly built surface: identity entry, record, window-list
    /// observation
    fn adopt_surface(&mut self, surface: Surface) {
        let id = surface.id();
        let channel = surface.channel();
        self.registry
            .register(id, channel.process_id, channel.routing_id);
        self.records.insert(id, TabRecord::new(id));
        self.observers.observe_window_list(id);
        self.surfaces.insert(id, surface);
        log::debug!("surface {} created on {}", id, channel);
    }

    /// Tear down a surface immediately. Prefer [`TabHost::destroy_tab`]
    /// from inside event handling.
    pub fn destroy_surface(&mut self, id: SurfaceId) -> bool {
        if !self.surfaces.contains_key(&id) {
            return false;
        }
        let bound = self
            .records
            .get(&id)
            .is_some_and(|r| r.owning_window.is_some());
        if bound {
            self.move_to_window(id, None);
        }
        self.registry.unregister(id);
        self.observers.forget_surface(id);
        self.records.remove(&id);
        self.surfaces.remove(&id);
        log::debug!("surface {} destroyed", id);
        true
    }

    /// Schedule destruction for the next tick
    pub fn destroy_tab(&mut self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id) && self.tasks.post_destroy(id)
    }

    /// Commit a navigation on `id`. Returns false for unknown surfaces.
    pub fn navigate(&mut self, id: SurfaceId, url: &str) -> Result<bool> {
        let Some(surface) = self.surfaces.get_mut(&id) else {
            return Ok(false);
        };
        surface.navigation_mut().navigate(url)?;
        surface.load();
        Ok(true)
    }

    /// The surface's render channel was (re)created, e.g. after a
    /// cross-process navigation
    pub fn render_channel_changed(&mut self, id: SurfaceId, process_id: i32, routing_id: i32) -> bool {
        let Some(surface) = self.surfaces.get_mut(&id) else {
            return false;
        };
        surface.set_channel(RenderChannel::new(process_id, routing_id));
        self.registry.register(id, process_id, routing_id);
        true
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    pub fn record(&self, id: SurfaceId) -> Option<&TabRecord> {
        self.records.get(&id)
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Resolve a tab through the identity registry.
    ///
    /// Goes identity -> render channel -> surface on that channel, and only
    /// answers if that surface still carries the same identity.
    pub fn tab_by_id(&self, id: SurfaceId) -> Option<&Surface> {
        let channel = self.registry.lookup(id)?;
        self.surfaces
            .values()
            .find(|s| s.channel() == channel)
            .filter(|s| s.id() == id)
    }

    /// [`TabHost::tab_by_id`] restricted to one browsing context group
    pub fn tab_by_id_in_context(&self, id: SurfaceId, partition: &str) -> Option<&Surface> {
        self.tab_by_id(id).filter(|s| s.partition() == partition)
    }

    pub fn is_discarded(&self, id: SurfaceId) -> bool {
        self.surfaces.get(&id).is_some_and(Surface::is_discarded)
    }

    pub fn is_auto_discardable(&self, id: SurfaceId) -> bool {
        self.surfaces.get(&id).is_some_and(Surface::is_auto_discardable)
    }

    pub fn set_auto_discardable(&mut self, id: SurfaceId, auto_discardable: bool) -> bool {
        match self.surfaces.get_mut(&id) {
            Some(surface) => {
                surface.set_auto_discardable(auto_discardable);
                true
            }
            None => false,
        }
    }

    /// Merge embedder values into the tab's snapshot
    pub fn set_tab_values(&mut self, id: SurfaceId, values: Map<String, Value>) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.merge_values(values);
                true
            }
            None => false,
        }
    }

    /// Whether `id` is the active tab of its window
    pub fn is_active(&self, id: SurfaceId) -> bool {
        self.records
            .get(&id)
            .and_then(|r| r.owning_window)
            .and_then(|w| self.windows.get(w))
            .is_some_and(|w| w.tab_strip().active_surface() == Some(id))
    }

    pub fn tab_value(&self, id: SurfaceId) -> Option<TabValue> {
        let record = self.records.get(&id)?;
        let surface = self.surfaces.get(&id)?;
        let active = self.is_active(id);

        let value = TabValue {
            id: id.get(),
            window_id: record.window_id(),
            incognito: surface.is_off_the_record(),
            active,
            url: surface.url().map(|u| u.to_string()).unwrap_or_default(),
            title: surface.title().to_string(),
            status: if surface.is_loading() {
                TabStatus::Loading
            } else {
                TabStatus::Complete
            },
            discarded: surface.is_discarded(),
            auto_discardable: surface.is_auto_discardable(),
            highlighted: active,
            index: record.index().map(|i| i as i32).unwrap_or(-1),
            pinned: record.is_pinned(),
            selected: active,
            extra: Map::new(),
        };
        Some(value.with_extra(record.values().clone()))
    }

    // --- windows and tab strips -----------------------------------------

    /// Open a new window; it becomes the last active window
    pub fn open_window(&mut self) -> WindowId {
        let id = WindowId::new(self.next_window_id);
        self.next_window_id += 1;
        self.windows.add(Window::new(id));
        log::info!("{} opened", id);
        self.set_last_active_window(id);
        id
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn windows(&self) -> &WindowList {
        &self.windows
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn last_active_window(&self) -> Option<WindowId> {
        self.windows.last_active()
    }

    pub fn index_of(&self, window: WindowId, surface: SurfaceId) -> Option<usize> {
        self.windows.get(window)?.tab_strip().index_of(surface)
    }

    /// Observe a window's strip from outside the host
    pub fn add_strip_listener(&mut self, window: WindowId, listener: StripListener) -> bool {
        if !self.windows.contains(window) {
            return false;
        }
        self.observers.add_listener(window, listener);
        true
    }

    /// Put `surface` into slot `index` of `window`, returning the surface
    /// that was there. The slot changes occupant in one step.
    pub fn replace_tab_at(
        &mut self,
        window: WindowId,
        index: usize,
        surface: SurfaceId,
    ) -> Option<SurfaceId> {
        if !self.surfaces.contains_key(&surface) {
            return None;
        }
        if let Some((other, _)) = self.windows.position_of(surface) {
            debug_assert!(false, "surface {} is already in {}", surface, other);
            log::warn!("refusing to replace with {}: already in {}", surface, other);
            return None;
        }
        let event = self
            .windows
            .get_mut(window)?
            .tab_strip_mut()
            .replace_at(index, surface)?;
        let TabStripEvent::Replaced { old, .. } = event else {
            return None;
        };
        log::debug!("{} slot {}: {} -> {}", window, index, old, surface);
        self.publish_strip_event(window, event);
        Some(old)
    }

    /// Remove the tab at `index` from `window`'s strip
    pub fn detach_tab_at(&mut self, window: WindowId, index: usize) -> Option<SurfaceId> {
        let event = self
            .windows
            .get_mut(window)?
            .tab_strip_mut()
            .detach_at(index)?;
        let TabStripEvent::Detached { surface, .. } = event else {
            return None;
        };
        self.publish_strip_event(window, event);
        Some(surface)
    }

    pub fn set_tab_pinned(&mut self, window: WindowId, index: usize, pinned: bool) -> bool {
        let event = self
            .windows
            .get_mut(window)
            .and_then(|w| w.tab_strip_mut().set_pinned(index, pinned));
        match event {
            Some(event) => {
                self.publish_strip_event(window, event);
                true
            }
            None => false,
        }
    }

    pub fn activate_tab_at(&mut self, window: WindowId, index: usize) -> bool {
        let event = self
            .windows
            .get_mut(window)
            .and_then(|w| w.tab_strip_mut().activate_at(index));
        match event {
            Some(event) => {
                self.publish_strip_event(window, event);
                true
            }
            None => false,
        }
    }

    /// Deliver a strip change: external listeners first, then every record
    /// subscribed to the window, then re-sync record indices
    fn publish_strip_event(&mut self, window: WindowId, event: TabStripEvent) {
        if let Some(strip) = self.windows.get(window).map(Window::tab_strip) {
            for listener in self.observers.listeners(window) {
                listener(&event, strip);
            }
        }
        for id in self.observers.subscribers(window) {
            self.on_tab_strip_event(id, window, &event);
        }
        self.sync_indices(window);
    }

    /// Bring `index` of every record bound to `window` in line with the strip
    fn sync_indices(&mut self, window: WindowId) {
        let Some(strip) = self.windows.get(window).map(Window::tab_strip) else {
            return;
        };
        for (position, surface) in strip.surfaces().enumerate() {
            if let Some(record) = self.records.get_mut(&surface) {
                if record.owning_window == Some(window) {
                    record.index = Some(position);
                }
            }
        }
    }

    /// Window and strip index currently holding `id`'s record
    fn strip_position(&self, id: SurfaceId) -> Option<(WindowId, usize)> {
        let window = self.records.get(&id)?.owning_window?;
        let index = self.windows.get(window)?.tab_strip().index_of(id)?;
        Some((window, index))
    }

    // --- deferred work --------------------------------------------------

    /// Handle for posting completions from background work
    pub fn task_poster(&self) -> TaskPoster {
        self.tasks.poster()
    }

    pub fn is_destroy_pending(&self, id: SurfaceId) -> bool {
        self.tasks.is_destroy_pending(id)
    }

    /// One control-loop tick: run everything queued before this call.
    /// Returns the number of tasks that did work.
    pub fn run_pending_tasks(&mut self) -> usize {
        let mut ran = 0;
        for task in self.tasks.drain() {
            match task {
                DeferredTask::DidAttach(id) => {
                    if self.surfaces.get(&id).is_some_and(Surface::is_attached) {
                        self.did_attach(id);
                        ran += 1;
                    }
                }
                DeferredTask::DestroySurface(id) => {
                    self.tasks.finish_destroy(id);
                    if self.destroy_surface(id) {
                        ran += 1;
                    }
                }
                DeferredTask::RunForSurface { target, callback } => {
                    match self.surfaces.get_mut(&target) {
                        Some(surface) => {
                            callback(surface);
                            ran += 1;
                        }
                        None => log::warn!("dropping deferred task for destroyed surface {}", target),
                    }
                }
            }
        }
        ran
    }

    /// Tick until a tick does no work
    pub fn run_until_idle(&mut self) -> usize {
        let mut total = 0;
        for _ in 0..MAX_IDLE_TICKS {
            let ran = self.run_pending_tasks();
            if ran == 0 {
                break;
            }
            total += ran;
        }
        total
    }
}

impl Default for TabHost {
    fn default() -> Self {
        Self::new()
    }
}
