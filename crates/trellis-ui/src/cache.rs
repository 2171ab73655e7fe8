//! One live renderer per widget, created lazily.
//!
//! The cache owns every renderer the host creates. Entries are keyed by
//! [`WidgetId`] and remember a `Weak` reference to their widget, so a widget
//! that was dropped by its owner can have its renderer torn down on the next
//! [`RendererCache::sweep`].
//!
//! # Invariants
//!
//! - At most one live renderer per widget id.
//! - A superseded renderer is destroyed before its entry is removed.
//! - A destroyed renderer is never handed out again.

use std::rc::{Rc, Weak};

use trellis_core::alloc::HashMap;
use trellis_core::profiling::profile_function;

use crate::renderer::RendererHandle;
use crate::theme_dispatcher::ThemeDispatcher;
use crate::widget::{Widget, WidgetId, WidgetRef};

struct CacheEntry {
    renderer: RendererHandle,
    widget: Weak<dyn Widget>,
    last_used: u64,
}

impl CacheEntry {
    fn is_usable(&self) -> bool {
        !self.renderer.is_destroyed() && self.widget.strong_count() > 0
    }
}

/// Owner of the widget → renderer mapping.
pub struct RendererCache {
    entries: HashMap<WidgetId, CacheEntry>,
    frame: u64,
    idle_frames: Option<u64>,
    created: u64,
}

impl RendererCache {
    /// A cache that keeps renderers until they are invalidated or their
    /// widget is dropped.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            frame: 0,
            idle_frames: None,
            created: 0,
        }
    }

    /// Also expire renderers that have not been requested for more than
    /// `frames` sweeps.
    pub fn with_idle_expiry(frames: u64) -> Self {
        let mut cache = Self::new();
        cache.idle_frames = Some(frames);
        cache
    }

    /// Return the live renderer for `widget`, creating it on first use.
    ///
    /// If the cached renderer was destroyed behind the cache's back, a fresh
    /// one replaces it. New renderers receive the dispatcher's current theme
    /// and are registered for future broadcasts.
    pub fn get(&mut self, widget: &WidgetRef) -> RendererHandle {
        profile_function!();

        let id = widget.id();
        if let Some(entry) = self.entries.get_mut(&id) {
            if !entry.renderer.is_destroyed() {
                entry.last_used = self.frame;
                return entry.renderer.clone();
            }
            tracing::debug!(
                "{} for {} was destroyed outside the cache, replacing it",
                entry.renderer.id(),
                id
            );
            self.entries.remove(&id);
        }

        let theme = ThemeDispatcher::current_or_default();
        let renderer = RendererHandle::new(id, Rc::clone(widget).create_renderer(&theme));
        ThemeDispatcher::register(&renderer);
        self.created += 1;

        tracing::trace!(
            "Created {} for {} ({})",
            renderer.id(),
            id,
            widget.debug_name()
        );

        self.entries.insert(
            id,
            CacheEntry {
                renderer: renderer.clone(),
                widget: Rc::downgrade(widget),
                last_used: self.frame,
            },
        );
        renderer
    }

    /// Live cached renderer for `id`, without creating one.
    ///
    /// `None` if nothing is cached, the renderer was destroyed, or the
    /// widget has been dropped.
    pub fn renderer(&self, id: WidgetId) -> Option<RendererHandle> {
        self.entries
            .get(&id)
            .filter(|entry| entry.is_usable())
            .map(|entry| entry.renderer.clone())
    }

    /// The widget behind a cached entry, if it is still alive.
    pub fn widget(&self, id: WidgetId) -> Option<WidgetRef> {
        self.entries.get(&id).and_then(|entry| entry.widget.upgrade())
    }

    /// Destroy and forget the renderer for `id`.
    ///
    /// The next [`RendererCache::get`] builds a new instance. Returns `false`
    /// if nothing was cached.
    pub fn invalidate(&mut self, id: WidgetId) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };
        if !entry.renderer.is_destroyed() {
            entry.renderer.destroy();
        }
        self.entries.remove(&id);
        tracing::debug!("Invalidated renderer for {}", id);
        true
    }

    /// End-of-frame maintenance.
    ///
    /// Destroys renderers whose widget was dropped and, with idle expiry
    /// enabled, renderers not requested within the idle window. Hidden
    /// widgets keep their renderer unless it idles out. Returns the number
    /// of renderers removed.
    pub fn sweep(&mut self) -> usize {
        profile_function!();

        let frame = self.frame;
        let idle_frames = self.idle_frames;
        let expired: Vec<WidgetId> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                let widget_gone = entry.widget.strong_count() == 0;
                let idle = idle_frames
                    .is_some_and(|limit| frame.saturating_sub(entry.last_used) > limit);
                widget_gone || idle || entry.renderer.is_destroyed()
            })
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            self.invalidate(*id);
        }

        self.frame += 1;
        if !expired.is_empty() {
            tracing::debug!("Swept {} renderers at frame {}", expired.len(), frame);
        }
        expired.len()
    }

    /// Destroy every cached renderer.
    pub fn clear(&mut self) {
        let ids: Vec<WidgetId> = self.entries.keys().copied().collect();
        for id in ids {
            self.invalidate(id);
        }
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sweeps performed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Renderers created over the cache's lifetime.
    pub fn created_count(&self) -> u64 {
        self.created
    }
}

impl Default for RendererCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RendererCache {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for RendererCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererCache")
            .field("entries", &self.entries.len())
            .field("frame", &self.frame)
            .field("idle_frames", &self.idle_frames)
            .finish()
    }
}
