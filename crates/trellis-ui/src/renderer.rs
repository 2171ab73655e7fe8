//! Lifecycle enforcement around consumer renderers.
//!
//! Every renderer the cache creates is wrapped in a [`RendererHandle`]. The
//! handle is the only way host code talks to a renderer, and it tracks
//! whether the renderer is still live. Touching a destroyed renderer, or
//! destroying one twice, is a programming error in the caller and panics
//! with a `renderer contract violation` message instead of silently doing
//! nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use trellis_core::geometry::Size;

use crate::canvas_object::CanvasObject;
use crate::color::Color;
use crate::theme::Theme;
use crate::widget::{Renderer, WidgetId};

static NEXT_RENDERER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one renderer instance. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RendererId(u64);

impl RendererId {
    fn next() -> Self {
        Self(NEXT_RENDERER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Renderer#{}", self.0)
    }
}

enum Lifecycle {
    Live(Box<dyn Renderer>),
    Destroyed,
}

struct RendererCell {
    id: RendererId,
    widget: WidgetId,
    lifecycle: RefCell<Lifecycle>,
}

/// Shared, lifecycle-checked handle to a renderer.
///
/// Clones refer to the same instance. The cache holds one strong handle per
/// widget; the theme dispatcher only holds [`WeakRendererHandle`]s.
#[derive(Clone)]
pub struct RendererHandle {
    inner: Rc<RendererCell>,
}

impl RendererHandle {
    pub fn new(widget: WidgetId, renderer: Box<dyn Renderer>) -> Self {
        Self {
            inner: Rc::new(RendererCell {
                id: RendererId::next(),
                widget,
                lifecycle: RefCell::new(Lifecycle::Live(renderer)),
            }),
        }
    }

    pub fn id(&self) -> RendererId {
        self.inner.id
    }

    /// The widget this renderer draws.
    pub fn widget_id(&self) -> WidgetId {
        self.inner.widget
    }

    pub fn is_destroyed(&self) -> bool {
        // A renderer that is mid-call is live by definition.
        self.inner
            .lifecycle
            .try_borrow()
            .is_ok_and(|state| matches!(*state, Lifecycle::Destroyed))
    }

    pub fn ptr_eq(&self, other: &RendererHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakRendererHandle {
        WeakRendererHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn layout(&self, size: Size<f32>) {
        self.with_live_mut("layout", |renderer| renderer.layout(size.clamped()));
    }

    pub fn min_size(&self) -> Size<f32> {
        self.with_live("min_size", |renderer| renderer.min_size().clamped())
    }

    pub fn refresh(&self) {
        self.with_live_mut("refresh", |renderer| renderer.refresh());
    }

    pub fn apply_theme(&self, theme: &Theme) {
        self.with_live_mut("apply_theme", |renderer| renderer.apply_theme(theme));
    }

    pub fn background_color(&self) -> Color {
        self.with_live("background_color", |renderer| renderer.background_color())
    }

    /// Snapshot of the renderer's children, back to front.
    pub fn objects(&self) -> Vec<CanvasObject> {
        self.with_live("objects", |renderer| renderer.objects().to_vec())
    }

    /// Tear the renderer down.
    ///
    /// Release failures reported by the renderer are logged and swallowed;
    /// the handle is dead afterwards either way.
    ///
    /// # Panics
    ///
    /// If the renderer was already destroyed.
    #[track_caller]
    pub fn destroy(&self) {
        let previous = {
            let Ok(mut state) = self.inner.lifecycle.try_borrow_mut() else {
                self.violation("destroy", "renderer is busy in another call")
            };
            std::mem::replace(&mut *state, Lifecycle::Destroyed)
        };

        match previous {
            Lifecycle::Live(mut renderer) => {
                if let Err(err) = renderer.destroy() {
                    tracing::warn!(
                        "{} for {} failed to release resources: {}",
                        self.inner.id,
                        self.inner.widget,
                        err
                    );
                }
                tracing::trace!("Destroyed {} for {}", self.inner.id, self.inner.widget);
            }
            Lifecycle::Destroyed => self.violation("destroy", "renderer was already destroyed"),
        }
    }

    #[track_caller]
    fn with_live<R>(&self, op: &str, f: impl FnOnce(&dyn Renderer) -> R) -> R {
        let Ok(state) = self.inner.lifecycle.try_borrow() else {
            self.violation(op, "renderer is busy in another call")
        };
        match &*state {
            Lifecycle::Live(renderer) => f(renderer.as_ref()),
            Lifecycle::Destroyed => self.violation(op, "renderer was destroyed"),
        }
    }

    #[track_caller]
    fn with_live_mut<R>(&self, op: &str, f: impl FnOnce(&mut dyn Renderer) -> R) -> R {
        let Ok(mut state) = self.inner.lifecycle.try_borrow_mut() else {
            self.violation(op, "renderer is busy in another call")
        };
        match &mut *state {
            Lifecycle::Live(renderer) => f(renderer.as_mut()),
            Lifecycle::Destroyed => self.violation(op, "renderer was destroyed"),
        }
    }

    #[track_caller]
    fn violation(&self, op: &str, reason: &str) -> ! {
        panic!(
            "renderer contract violation: {} on {} for {}: {}",
            op, self.inner.id, self.inner.widget, reason
        )
    }
}

impl fmt::Debug for RendererHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererHandle")
            .field("id", &self.inner.id)
            .field("widget", &self.inner.widget)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Non-owning reference to a renderer.
#[derive(Clone)]
pub struct WeakRendererHandle {
    inner: Weak<RendererCell>,
}

impl WeakRendererHandle {
    /// Upgrade to a handle if the renderer is still reachable and live.
    pub fn upgrade(&self) -> Option<RendererHandle> {
        let inner = self.inner.upgrade()?;
        let handle = RendererHandle { inner };
        (!handle.is_destroyed()).then_some(handle)
    }
}

impl fmt::Debug for WeakRendererHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRendererHandle")
            .field("alive", &self.upgrade().is_some())
            .finish()
    }
}
