//! Deferred release of GPU-backed resources.
//!
//! Resources owned by external collaborators may become unreachable on any
//! thread. They are queued here and released on the render thread, once
//! per frame, through [`DrawBackend::release`].

use std::{
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::debug;

use crate::render::DrawBackend;

/// A handle to a backend resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuResource {
    /// A texture name.
    Texture(u64),
    /// A vertex buffer name.
    VertexBuffer(u64),
}

/// Cloneable, thread-safe handle to the pending-release queue.
#[derive(Debug, Clone, Default)]
pub struct Disposer {
    /// Resources waiting for the next frame.
    queue: Arc<Mutex<Vec<GpuResource>>>,
}

impl Disposer {
    /// Construct an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the queue. A panic on another thread while holding the lock
    /// leaves the queue itself intact, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Vec<GpuResource>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a resource for release on the render thread.
    pub fn defer(&self, resource: GpuResource) {
        self.lock().push(resource);
    }

    /// Number of queued resources.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Release every queued resource through the backend. Returns the
    /// number released.
    pub fn drain(&self, backend: &mut dyn DrawBackend) -> usize {
        let batch = mem::take(&mut *self.lock());
        let n = batch.len();
        for resource in batch {
            backend.release(resource);
        }
        if n > 0 {
            debug!(released = n, "drained disposal queue");
        }
        n
    }
}
