//! Surface creation

use std::collections::HashMap;

use super::{RenderChannel, Surface, SurfaceId};
use crate::utils::Result;
use crate::window::WindowId;

/// Parameters for creating a new tab surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceParams {
    /// Window to attach the new tab to, if any
    pub window: Option<WindowId>,
    /// Browsing context group; the host default is used when unset
    pub partition: Option<String>,
    pub off_the_record: bool,
    /// Initial navigation
    pub url: Option<String>,
    pub pinned: bool,
    pub active: bool,
}

impl SurfaceParams {
    pub fn in_window(window: WindowId) -> Self {
        Self {
            window: Some(window),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }
}

/// Creates surfaces on behalf of the host.
///
/// Identities are allocated by the host; the factory only provides the
/// render channel and browsing context group.
#[cfg_attr(test, mockall::automock)]
pub trait SurfaceFactory {
    /// Create a real content surface
    fn create_surface(&mut self, id: SurfaceId, params: &SurfaceParams) -> Result<Surface>;

    /// Create an inert stand-in sharing `based_on`'s browsing context group
    fn create_placeholder(&mut self, id: SurfaceId, based_on: &Surface) -> Result<Surface>;
}

/// Factory that hands out one renderer process per browsing context group
#[derive(Debug)]
pub struct InProcessSurfaceFactory {
    default_partition: String,
    processes: HashMap<String, i32>,
    next_process_id: i32,
    next_routing_id: i32,
}

impl InProcessSurfaceFactory {
    pub fn new(default_partition: impl Into<String>) -> Self {
        Self {
            default_partition: default_partition.into(),
            processes: HashMap::new(),
            next_process_id: 1,
            next_routing_id: 1,
        }
    }

    /// Reuse the renderer for `partition`, spawning one on first use
    fn process_for(&mut self, partition: &str) -> i32 {
        if let Some(&id) = self.processes.get(partition) {
            return id;
        }
        let id = self.next_process_id;
        self.next_process_id += 1;
        self.processes.insert(partition.to_string(), id);
        id
    }

    fn allocate_channel(&mut self, partition: &str) -> RenderChannel {
        let process_id = self.process_for(partition);
        let routing_id = self.next_routing_id;
        self.next_routing_id += 1;
        RenderChannel::new(process_id, routing_id)
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }
}

impl Default for InProcessSurfaceFactory {
    fn default() -> Self {
        Self::new("persist:default")
    }
}

impl SurfaceFactory for InProcessSurfaceFactory {
    fn create_surface(&mut self, id: SurfaceId, params: &SurfaceParams) -> Result<Surface> {
        let partition = params
            .partition
            .clone()
            .unwrap_or_else(|| self.default_partition.clone());
        let channel = self.allocate_channel(&partition);
        Ok(Surface::new(id, partition, channel).with_off_the_record(params.off_the_record))
    }

    fn create_placeholder(&mut self, id: SurfaceId, based_on: &Surface) -> Result<Surface> {
        let channel = self.allocate_channel(based_on.partition());
        Ok(Surface::new(id, based_on.partition(), channel)
            .with_off_the_record(based_on.is_off_the_record()))
    }
}
