//! The host side of the renderer protocol.
//!
//! A [`Canvas`] belongs to the rendering loop. It owns the root objects, the
//! renderer cache and the refresh queue, and turns them into one [`Frame`]
//! per [`Canvas::paint`]:
//!
//! 1. pending refreshes are flushed, once per widget;
//! 2. the roots are laid out to the canvas size and painted back to front;
//! 3. the cache is swept, tearing down renderers of dropped widgets.

use trellis_core::alloc::HashSet;
use trellis_core::geometry::{Pos, Size};
use trellis_core::profiling::{self, profile_function};

use crate::cache::RendererCache;
use crate::canvas_object::CanvasObject;
use crate::draw_list::DrawList;
use crate::paint::{PaintStats, Painter};
use crate::refresh::{RefreshHandle, RefreshScheduler};
use crate::renderer::RendererHandle;
use crate::widget::{WidgetId, WidgetRef};

/// Canvas configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    /// Size every root object is laid out to.
    pub size: Size<f32>,
    /// Expire renderers not painted for this many frames. `None` keeps them
    /// until their widget is detached or dropped.
    pub renderer_idle_frames: Option<u64>,
}

impl CanvasConfig {
    pub fn with_size(mut self, size: Size<f32>) -> Self {
        self.size = size.clamped();
        self
    }

    pub fn with_renderer_idle_frames(mut self, frames: u64) -> Self {
        self.renderer_idle_frames = Some(frames);
        self
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            renderer_idle_frames: None,
        }
    }
}

/// Output of one paint pass.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame counter, starting at 1
    pub number: u64,
    pub draw_list: DrawList,
    pub stats: PaintStats,
    /// Renderers refreshed before painting
    pub refreshed: usize,
    /// Renderers torn down by the end-of-frame sweep
    pub swept: usize,
}

/// Root of a widget tree and owner of every renderer drawn into it.
pub struct Canvas {
    size: Size<f32>,
    content: Vec<CanvasObject>,
    cache: RendererCache,
    scheduler: RefreshScheduler,
    frames: u64,
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        let cache = match config.renderer_idle_frames {
            Some(frames) => RendererCache::with_idle_expiry(frames),
            None => RendererCache::new(),
        };
        Self {
            size: config.size.clamped(),
            content: Vec::new(),
            cache,
            scheduler: RefreshScheduler::new(),
            frames: 0,
        }
    }

    pub fn size(&self) -> Size<f32> {
        self.size
    }

    pub fn resize(&mut self, size: Size<f32>) {
        self.size = size.clamped();
    }

    /// Replace the root objects.
    ///
    /// Widgets that are not part of the new content are detached and their
    /// renderers invalidated.
    pub fn set_content(&mut self, content: Vec<CanvasObject>) {
        let previous = std::mem::take(&mut self.content);
        for object in &previous {
            if !content.iter().any(|kept| kept.ptr_eq(object)) {
                self.detach(object);
            }
        }
        for object in content {
            self.add(object);
        }
    }

    /// Append a root object, painted above the existing ones.
    pub fn add(&mut self, object: impl Into<CanvasObject>) {
        let object = object.into();
        if let Some(widget) = object.as_widget() {
            widget.attach(&self.scheduler.handle());
        }
        self.content.push(object);
    }

    /// Detach a root object.
    ///
    /// Detachment is permanent: the renderers of a removed widget and of
    /// every widget reachable through them are destroyed. Returns `false` if
    /// `object` was not a root.
    pub fn remove(&mut self, object: &CanvasObject) -> bool {
        let Some(index) = self.content.iter().position(|root| root.ptr_eq(object)) else {
            return false;
        };
        let removed = self.content.remove(index);
        self.detach(&removed);
        true
    }

    pub fn content(&self) -> &[CanvasObject] {
        &self.content
    }

    /// Handle other threads and callbacks can use to request refreshes.
    pub fn refresh_handle(&self) -> RefreshHandle {
        self.scheduler.handle()
    }

    /// Queue a refresh of `id`'s renderer before the next paint.
    pub fn request_refresh(&self, id: WidgetId) -> bool {
        self.scheduler.request(id)
    }

    /// The renderer for `widget`, created if needed.
    pub fn renderer_for(&mut self, widget: &WidgetRef) -> RendererHandle {
        self.cache.get(widget)
    }

    pub fn cache(&self) -> &RendererCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RendererCache {
        &mut self.cache
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Frames painted so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run one frame.
    pub fn paint(&mut self) -> Frame {
        profile_function!();

        let refreshed = self.scheduler.flush(&self.cache);

        for root in &self.content {
            let geometry = root.geometry();
            geometry.move_to(Pos::ORIGIN);
            geometry.resize(self.size);
        }
        let (draw_list, stats) = Painter::new(&mut self.cache)
            .with_refresh(self.scheduler.handle())
            .paint(&self.content);

        let swept = self.cache.sweep();
        self.frames += 1;
        profiling::new_frame();

        tracing::trace!(
            "Frame {}: {} commands, {} widgets, {} refreshed, {} swept",
            self.frames,
            draw_list.len(),
            stats.widgets,
            refreshed,
            swept
        );

        Frame {
            number: self.frames,
            draw_list,
            stats,
            refreshed,
            swept,
        }
    }

    fn detach(&mut self, object: &CanvasObject) {
        let Some(widget) = object.as_widget() else {
            return;
        };
        let mut visited = HashSet::default();
        let invalidated = self.invalidate_subtree(widget.id(), &mut visited);
        tracing::debug!(
            "Detached {} ({}), invalidated {} renderers",
            widget.id(),
            widget.debug_name(),
            invalidated
        );
    }

    fn invalidate_subtree(&mut self, id: WidgetId, visited: &mut HashSet<WidgetId>) -> usize {
        if !visited.insert(id) {
            return 0;
        }
        self.scheduler.cancel(id);
        let Some(renderer) = self.cache.renderer(id) else {
            return 0;
        };
        let children: Vec<WidgetId> = renderer
            .objects()
            .iter()
            .filter_map(CanvasObject::as_widget)
            .map(|child| child.id())
            .collect();
        let mut count = usize::from(self.cache.invalidate(id));
        for child in children {
            count += self.invalidate_subtree(child, visited);
        }
        count
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("size", &self.size)
            .field("content", &self.content.len())
            .field("cache", &self.cache)
            .field("frames", &self.frames)
            .finish()
    }
}
