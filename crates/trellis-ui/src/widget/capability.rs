//! Capability traits implemented by consumer widgets and their renderers.
//!
//! A custom component is a pair: a [`Widget`] that holds logical state, and a
//! [`Renderer`] that turns that state into drawable objects. The toolkit owns
//! every renderer (through the [`RendererCache`](crate::RendererCache)) and
//! drives it from the rendering loop; the widget only knows how to make one.
//!
//! # Ownership
//!
//! Widgets are shared as `Rc<dyn Widget>` between their owner (application
//! code or a parent container) and the paint tree. A renderer keeps a `Weak`
//! back-reference to its widget, so it can read state but never extends the
//! widget's life:
//!
//! ```rust,ignore
//! impl Widget for Toggle {
//!     fn create_renderer(self: Rc<Self>, theme: &Theme) -> Box<dyn Renderer> {
//!         Box::new(ToggleRenderer::new(Rc::downgrade(&self), theme))
//!     }
//! }
//! ```

use std::rc::Rc;

use trellis_core::geometry::Size;

use super::id::WidgetId;
use crate::canvas_object::CanvasObject;
use crate::color::Color;
use crate::error::DestroyError;
use crate::geometry::Geometry;
use crate::refresh::RefreshHandle;
use crate::theme::Theme;

/// Shared reference to any widget.
pub type WidgetRef = Rc<dyn Widget>;

/// A stateful drawable node that can manufacture its own renderer.
///
/// The widget's exposed state must fully determine its appearance: a renderer
/// built from it at any time must draw the same thing as one that has been
/// alive and refreshed all along.
pub trait Widget: Geometry + 'static {
    /// Stable identity used by the renderer cache and refresh scheduler.
    fn id(&self) -> WidgetId;

    /// Get the widget's name for debugging.
    fn debug_name(&self) -> &str {
        "Widget"
    }

    /// Build a new, independent renderer for the current state.
    ///
    /// Called lazily by the cache, and again every time a previous renderer
    /// was invalidated. Must never hand back an instance that was destroyed.
    fn create_renderer(self: Rc<Self>, theme: &Theme) -> Box<dyn Renderer>;

    /// Called when the widget joins a canvas with the queue its state
    /// changes should be reported to. Containers pass it on to their
    /// children.
    fn attach(&self, _refresh: &RefreshHandle) {}
}

/// Drawing delegate for one widget.
///
/// Only the rendering loop calls these, and never two at once for the same
/// instance. After [`Renderer::destroy`] the instance is dead; the
/// [`RendererHandle`](crate::RendererHandle) wrapping it turns any further
/// call into a panic.
pub trait Renderer {
    /// Position and size every child object within `size`.
    ///
    /// Depends only on `size` and the widget's current state, and is safe
    /// to repeat.
    fn layout(&mut self, size: Size<f32>);

    /// Smallest size that shows the content without clipping.
    fn min_size(&self) -> Size<f32>;

    /// Resynchronize the child objects with the widget's current state.
    ///
    /// Existing children are updated in place; they are only recreated when
    /// the widget's structure changed (an optional part appeared or went
    /// away).
    fn refresh(&mut self);

    /// Update theme-derived attributes of the children in place.
    fn apply_theme(&mut self, theme: &Theme);

    /// Fill painted beneath the children.
    fn background_color(&self) -> Color {
        Color::TRANSPARENT
    }

    /// Children in back-to-front paint order.
    fn objects(&self) -> &[CanvasObject];

    /// Release everything acquired by `refresh`/`apply_theme`.
    ///
    /// An `Err` is logged by the caller and teardown carries on.
    fn destroy(&mut self) -> Result<(), DestroyError> {
        Ok(())
    }
}
