//! Deferred task queue drained once per control-loop tick
//!
//! Work that must not run inside the call chain that requested it (guest
//! attach completion, surface teardown) and completions coming back from
//! background work are posted here. Targets are identities, resolved only
//! when the task runs.

use std::collections::HashSet;
use std::fmt;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::surface::{Surface, SurfaceId};

/// Callback run against a surface on the control thread
pub type SurfaceCallback = Box<dyn FnOnce(&mut Surface) + Send>;

pub enum DeferredTask {
    /// Guest attach finished; run the post-attach hook
    DidAttach(SurfaceId),
    DestroySurface(SurfaceId),
    /// Background completion for `target`; dropped if it no longer exists
    RunForSurface {
        target: SurfaceId,
        callback: SurfaceCallback,
    },
}

impl fmt::Debug for DeferredTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DidAttach(id) => f.debug_tuple("DidAttach").field(id).finish(),
            Self::DestroySurface(id) => f.debug_tuple("DestroySurface").field(id).finish(),
            Self::RunForSurface { target, .. } => f
                .debug_struct("RunForSurface")
                .field("target", target)
                .finish_non_exhaustive(),
        }
    }
}

/// Cloneable, `Send` handle for posting back to the control thread
#[derive(Debug, Clone)]
pub struct TaskPoster {
    sender: UnboundedSender<DeferredTask>,
}

impl TaskPoster {
    /// Returns false once the host has gone away
    pub fn post(&self, task: DeferredTask) -> bool {
        self.sender.send(task).is_ok()
    }

    pub fn post_for_surface<F>(&self, target: SurfaceId, callback: F) -> bool
    where
        F: FnOnce(&mut Surface) + Send + 'static,
    {
        self.post(DeferredTask::RunForSurface {
            target,
            callback: Box::new(callback),
        })
    }
}

#[derive(Debug)]
pub struct TaskQueue {
    sender: UnboundedSender<DeferredTask>,
    receiver: UnboundedReceiver<DeferredTask>,
    pending_destroy: HashSet<SurfaceId>,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            sender,
            receiver,
            pending_destroy: HashSet::new(),
        }
    }

    pub fn poster(&self) -> TaskPoster {
        TaskPoster {
            sender: self.sender.clone(),
        }
    }

    pub fn post(&self, task: DeferredTask) {
        // The receiver lives in `self`, so the channel cannot be closed here.
        let _ = self.sender.send(task);
    }

    /// Queue destruction of `id` unless it is already pending
    pub fn post_destroy(&mut self, id: SurfaceId) -> bool {
        if !self.pending_destroy.insert(id) {
            return false;
        }
        self.post(DeferredTask::DestroySurface(id));
        true
    }

    pub fn is_destroy_pending(&self, id: SurfaceId) -> bool {
        self.pending_destroy.contains(&id)
    }

    pub fn pending_destroy_count(&self) -> usize {
        self.pending_destroy.len()
    }

    /// A queued destruction of `id` is running; later requests queue anew
    pub fn finish_destroy(&mut self, id: SurfaceId) {
        self.pending_destroy.remove(&id);
    }

    /// Take everything queued so far. Tasks posted while the result is
    /// being processed stay queued for the next drain. Drained destructions
    /// stay pending until [`TaskQueue::finish_destroy`].
    pub fn drain(&mut self) -> Vec<DeferredTask> {
        let mut tasks = Vec::new();
        while let Ok(task) = self.receiver.try_recv() {
            tasks.push(task);
        }
        tasks
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_is_deduplicated_while_pending() {
        let mut queue = TaskQueue::new();
        let id = SurfaceId::new(5);
        assert!(queue.post_destroy(id));
        assert!(!queue.post_destroy(id));
        assert!(queue.is_destroy_pending(id));

        let tasks = queue.drain();
        assert_eq!(tasks.len(), 1);
        assert!(queue.is_destroy_pending(id));
        assert!(!queue.post_destroy(id));

        queue.finish_destroy(id);
        assert!(!queue.is_destroy_pending(id));
        assert_eq!(queue.pending_destroy_count(), 0);
        assert!(queue.post_destroy(id));
    }

    #[test]
    fn test_drain_takes_snapshot() {
        let mut queue = TaskQueue::new();
        queue.post(DeferredTask::DidAttach(SurfaceId::new(1)));
        let tasks = queue.drain();
        queue.post(DeferredTask::DidAttach(SurfaceId::new(2)));
        assert_eq!(tasks.len(), 1);
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_poster_is_send() {
        fn assert_send<T: Send>(_: &T) {}
        let queue = TaskQueue::new();
        let poster = queue.poster();
        assert_send(&poster);
        assert!(poster.post_for_surface(SurfaceId::new(1), |s| s.finish_loading()));
    }
}
