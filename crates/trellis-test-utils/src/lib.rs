//! Test utilities for trellis.
//!
//! This crate provides a widget/renderer pair that records every call the
//! host makes on it, so tests can assert on the renderer protocol without a
//! real widget implementation.
//!
//! # Overview
//!
//! - [`RecordingWidget`] - widget whose children, background and minimum
//!   size are set directly by the test
//! - [`CallLog`] - shared log of [`Call`]s, one per renderer method invocation
//!
//! Every renderer a widget creates gets a new instance number, so tests can
//! tell a reused renderer from a freshly created one.
//!
//! # Example
//!
//! ```rust
//! use trellis_test_utils::{RecordingWidget, RendererCall};
//! use trellis_ui::{RendererCache, WidgetRef};
//!
//! let widget = RecordingWidget::new();
//! let mut cache = RendererCache::new();
//! let widget_ref: WidgetRef = widget.clone();
//!
//! let renderer = cache.get(&widget_ref);
//! renderer.refresh();
//!
//! assert_eq!(widget.log().created(), 1);
//! assert_eq!(widget.log().count(0, |call| matches!(call, RendererCall::Refresh)), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::geometry::{Pos, Size};
use trellis_ui::{
    CanvasObject, Color, DestroyError, Geometry, GeometryState, RefreshHandle, RefreshSlot,
    Renderer, Theme, Widget, WidgetId,
};

/// A renderer method invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererCall {
    Create,
    Layout(Size<f32>),
    MinSize,
    Refresh,
    /// Name of the theme applied
    ApplyTheme(String),
    BackgroundColor,
    Objects,
    Destroy,
}

/// One recorded call on a specific renderer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub instance: usize,
    pub call: RendererCall,
}

/// Shared, thread-safe call log.
///
/// Clones append to the same log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
    instances: Arc<Mutex<usize>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_instance(&self) -> usize {
        let mut next = self.instances.lock();
        let instance = *next;
        *next += 1;
        instance
    }

    pub fn record(&self, instance: usize, call: RendererCall) {
        self.calls.lock().push(Call { instance, call });
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Calls made on one renderer instance, in order.
    pub fn calls_for(&self, instance: usize) -> Vec<RendererCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.instance == instance)
            .map(|call| call.call.clone())
            .collect()
    }

    /// Count the calls on `instance` matching `filter`.
    pub fn count(&self, instance: usize, filter: impl Fn(&RendererCall) -> bool) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.instance == instance && filter(&call.call))
            .count()
    }

    /// Number of renderers created so far.
    pub fn created(&self) -> usize {
        *self.instances.lock()
    }

    pub fn refreshes(&self, instance: usize) -> usize {
        self.count(instance, |call| matches!(call, RendererCall::Refresh))
    }

    pub fn destroys(&self, instance: usize) -> usize {
        self.count(instance, |call| matches!(call, RendererCall::Destroy))
    }

    pub fn themes_applied(&self, instance: usize) -> Vec<String> {
        self.calls_for(instance)
            .into_iter()
            .filter_map(|call| match call {
                RendererCall::ApplyTheme(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Drop every recorded call. Instance numbering carries on.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Widget with test-controlled content and a recording renderer.
pub struct RecordingWidget {
    id: WidgetId,
    geometry: GeometryState,
    children: RefCell<Vec<CanvasObject>>,
    min_size: Cell<Size<f32>>,
    background: Cell<Option<Color>>,
    fail_destroy: Cell<bool>,
    log: CallLog,
    refresh: RefreshSlot,
}

impl RecordingWidget {
    pub fn new() -> Rc<Self> {
        Self::with_log(CallLog::new())
    }

    /// A widget that records into an existing log.
    pub fn with_log(log: CallLog) -> Rc<Self> {
        Rc::new(Self {
            id: WidgetId::next(),
            geometry: GeometryState::new(),
            children: RefCell::new(Vec::new()),
            min_size: Cell::new(Size::ZERO),
            background: Cell::new(None),
            fail_destroy: Cell::new(false),
            log,
            refresh: RefreshSlot::new(),
        })
    }

    pub fn with_children(children: Vec<CanvasObject>) -> Rc<Self> {
        let widget = Self::new();
        *widget.children.borrow_mut() = children;
        widget
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Replace the children. Renderers see them after their next refresh.
    pub fn set_children(&self, children: Vec<CanvasObject>) {
        for child in &children {
            self.attach_child(child);
        }
        *self.children.borrow_mut() = children;
        self.changed();
    }

    pub fn push_child(&self, child: impl Into<CanvasObject>) {
        let child = child.into();
        self.attach_child(&child);
        self.children.borrow_mut().push(child);
        self.changed();
    }

    fn attach_child(&self, child: &CanvasObject) {
        if let (Some(widget), Some(handle)) = (child.as_widget(), self.refresh.handle()) {
            widget.attach(&handle);
        }
    }

    pub fn set_min_size(&self, size: Size<f32>) {
        self.min_size.set(size);
        self.changed();
    }

    /// Override the theme-derived background color.
    pub fn set_background(&self, color: Color) {
        self.background.set(Some(color));
        self.changed();
    }

    /// Make every renderer's `destroy` report a release failure.
    pub fn set_fail_destroy(&self, fail: bool) {
        self.fail_destroy.set(fail);
    }

    /// Report a state change to the attached refresh queue, if any.
    pub fn changed(&self) -> bool {
        self.refresh.request(self.id)
    }
}

impl Geometry for RecordingWidget {
    fn size(&self) -> Size<f32> {
        self.geometry.size()
    }

    fn resize(&self, size: Size<f32>) {
        self.geometry.resize(size);
    }

    fn position(&self) -> Pos<f32> {
        self.geometry.position()
    }

    fn move_to(&self, position: Pos<f32>) {
        self.geometry.move_to(position);
    }

    fn min_size(&self) -> Size<f32> {
        self.min_size.get()
    }

    fn visible(&self) -> bool {
        self.geometry.visible()
    }

    fn show(&self) {
        self.geometry.show();
    }

    fn hide(&self) {
        self.geometry.hide();
    }
}

impl Widget for RecordingWidget {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn debug_name(&self) -> &str {
        "RecordingWidget"
    }

    fn create_renderer(self: Rc<Self>, theme: &Theme) -> Box<dyn Renderer> {
        let instance = self.log.next_instance();
        self.log.record(instance, RendererCall::Create);
        Box::new(RecordingRenderer {
            instance,
            objects: self.children.borrow().clone(),
            background: self.background.get().unwrap_or(theme.colors.surface),
            log: self.log.clone(),
            widget: Rc::downgrade(&self),
        })
    }

    fn attach(&self, refresh: &RefreshHandle) {
        if !self.refresh.attach(refresh) {
            return;
        }
        for child in self.children.borrow().iter() {
            if let Some(widget) = child.as_widget() {
                widget.attach(refresh);
            }
        }
    }
}

/// Renderer created by [`RecordingWidget`].
pub struct RecordingRenderer {
    instance: usize,
    widget: Weak<RecordingWidget>,
    objects: Vec<CanvasObject>,
    background: Color,
    log: CallLog,
}

impl Renderer for RecordingRenderer {
    fn layout(&mut self, size: Size<f32>) {
        self.log.record(self.instance, RendererCall::Layout(size));
    }

    fn min_size(&self) -> Size<f32> {
        self.log.record(self.instance, RendererCall::MinSize);
        self.widget
            .upgrade()
            .map_or(Size::ZERO, |widget| widget.min_size.get())
    }

    fn refresh(&mut self) {
        self.log.record(self.instance, RendererCall::Refresh);
        if let Some(widget) = self.widget.upgrade() {
            self.objects = widget.children.borrow().clone();
            if let Some(color) = widget.background.get() {
                self.background = color;
            }
        }
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.log
            .record(self.instance, RendererCall::ApplyTheme(theme.name.clone()));
        let custom = self.widget.upgrade().and_then(|widget| widget.background.get());
        self.background = custom.unwrap_or(theme.colors.surface);
    }

    fn background_color(&self) -> Color {
        self.log.record(self.instance, RendererCall::BackgroundColor);
        self.background
    }

    fn objects(&self) -> &[CanvasObject] {
        self.log.record(self.instance, RendererCall::Objects);
        &self.objects
    }

    fn destroy(&mut self) -> Result<(), DestroyError> {
        self.log.record(self.instance, RendererCall::Destroy);
        let fail = self
            .widget
            .upgrade()
            .is_some_and(|widget| widget.fail_destroy.get());
        if fail {
            Err(DestroyError::new("recording subscription", "release refused"))
        } else {
            Ok(())
        }
    }
}
