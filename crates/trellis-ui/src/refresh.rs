//! Coalesced renderer refreshes.
//!
//! Widget state can change many times between two frames, from input
//! callbacks on the loop or from other threads. Each change only records the
//! widget id; the rendering loop drains the set once per tick, right before
//! painting, and refreshes each affected renderer exactly once.

use std::cell::RefCell;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::Mutex;
use trellis_core::alloc::RandomState;
use trellis_core::profiling::profile_function;

use crate::cache::RendererCache;
use crate::widget::WidgetId;

type PendingSet = IndexSet<WidgetId, RandomState>;

/// Thread-safe handle for requesting refreshes.
///
/// Cheap to clone and `Send + Sync`; requests only take effect when the
/// rendering loop next flushes its [`RefreshScheduler`].
#[derive(Clone, Default)]
pub struct RefreshHandle {
    pending: Arc<Mutex<PendingSet>>,
}

impl RefreshHandle {
    /// Queue a refresh for `id`.
    ///
    /// Returns `false` if one was already pending for this tick.
    pub fn request(&self, id: WidgetId) -> bool {
        self.pending.lock().insert(id)
    }

    /// Drop a pending request. Returns `false` if none was pending.
    pub fn cancel(&self, id: WidgetId) -> bool {
        self.pending.lock().shift_remove(&id)
    }

    pub fn is_pending(&self, id: WidgetId) -> bool {
        self.pending.lock().contains(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether both handles feed the same scheduler.
    pub fn same_queue(&self, other: &RefreshHandle) -> bool {
        Arc::ptr_eq(&self.pending, &other.pending)
    }

    fn take(&self) -> PendingSet {
        std::mem::take(&mut *self.pending.lock())
    }
}

impl std::fmt::Debug for RefreshHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshHandle")
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Slot a widget keeps its [`RefreshHandle`] in once attached.
///
/// State setters call [`RefreshSlot::request`]; before the widget is
/// attached to a canvas there is nothing to refresh and the call is a no-op.
#[derive(Debug, Default)]
pub struct RefreshSlot {
    handle: RefCell<Option<RefreshHandle>>,
}

impl RefreshSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handle`. Returns `false` if it was already attached to the
    /// same queue.
    pub fn attach(&self, handle: &RefreshHandle) -> bool {
        let mut slot = self.handle.borrow_mut();
        if slot.as_ref().is_some_and(|current| current.same_queue(handle)) {
            return false;
        }
        *slot = Some(handle.clone());
        true
    }

    pub fn handle(&self) -> Option<RefreshHandle> {
        self.handle.borrow().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.handle.borrow().is_some()
    }

    /// Queue a refresh for `id` if attached.
    pub fn request(&self, id: WidgetId) -> bool {
        self.handle
            .borrow()
            .as_ref()
            .is_some_and(|handle| handle.request(id))
    }
}

/// Loop-side half of the refresh queue.
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    queue: RefreshHandle,
    ticks: u64,
    dropped: u64,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle other contexts can use to request refreshes.
    pub fn handle(&self) -> RefreshHandle {
        self.queue.clone()
    }

    pub fn request(&self, id: WidgetId) -> bool {
        self.queue.request(id)
    }

    pub fn cancel(&self, id: WidgetId) -> bool {
        self.queue.cancel(id)
    }

    /// Ids waiting for the next flush, in request order.
    pub fn pending(&self) -> Vec<WidgetId> {
        self.queue.pending.lock().iter().copied().collect()
    }

    /// Run one tick: refresh every pending widget's cached renderer once.
    ///
    /// Requests for widgets that were dropped, detached, or never rendered
    /// are discarded without side effects. Requests made while refreshing
    /// wait for the next tick. Returns the number of renderers refreshed.
    pub fn flush(&mut self, cache: &RendererCache) -> usize {
        profile_function!();

        let batch = self.queue.take();
        self.ticks += 1;

        let mut refreshed = 0;
        for id in batch {
            match cache.renderer(id) {
                Some(renderer) => {
                    renderer.refresh();
                    refreshed += 1;
                }
                None => {
                    self.dropped += 1;
                    tracing::trace!("Dropping refresh for {}, no live renderer", id);
                }
            }
        }
        refreshed
    }

    /// Completed flushes.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Requests discarded because their widget had no live renderer.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
