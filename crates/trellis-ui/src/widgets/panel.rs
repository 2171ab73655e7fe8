use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use trellis_core::geometry::{Pos, Size};

use crate::canvas_object::CanvasObject;
use crate::color::Color;
use crate::geometry::{Geometry, GeometryState, forward_geometry};
use crate::refresh::{RefreshHandle, RefreshSlot};
use crate::theme::{Spacing, Theme};
use crate::theme_dispatcher::ThemeDispatcher;
use crate::widget::{Renderer, Widget, WidgetId};

/// Container that stacks its children vertically.
///
/// Children keep their minimum height and are stretched to the panel's
/// inner width. Hidden children take no space.
pub struct Panel {
    id: WidgetId,
    geometry: GeometryState,
    children: RefCell<Vec<CanvasObject>>,
    // Guards `min_size` against a panel that (transitively) contains itself.
    measuring: Cell<bool>,
    refresh: RefreshSlot,
}

impl Panel {
    pub fn new() -> Rc<Self> {
        Self::with_children(Vec::new())
    }

    pub fn with_children(children: Vec<CanvasObject>) -> Rc<Self> {
        Rc::new(Self {
            id: WidgetId::next(),
            geometry: GeometryState::new(),
            children: RefCell::new(children),
            measuring: Cell::new(false),
            refresh: RefreshSlot::new(),
        })
    }

    /// Append a child. This is a structural change; the renderer picks it up
    /// on its next refresh.
    pub fn push(&self, child: impl Into<CanvasObject>) {
        let child = child.into();
        if let (Some(widget), Some(handle)) = (child.as_widget(), self.refresh.handle()) {
            widget.attach(&handle);
        }
        self.children.borrow_mut().push(child);
        self.refresh.request(self.id);
    }

    /// Remove a child by identity. Returns `false` if it was not a child.
    pub fn remove(&self, child: &CanvasObject) -> bool {
        let mut children = self.children.borrow_mut();
        let Some(index) = children.iter().position(|c| c.ptr_eq(child)) else {
            return false;
        };
        children.remove(index);
        drop(children);
        self.refresh.request(self.id);
        true
    }

    pub fn children(&self) -> Vec<CanvasObject> {
        self.children.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    fn measure(&self) -> Size<f32> {
        if self.measuring.replace(true) {
            return Size::ZERO;
        }
        let spacing = ThemeDispatcher::current_or_default().spacing;
        let children = self.children();
        let size = stack_min_size(&children, spacing);
        self.measuring.set(false);
        size
    }
}

forward_geometry!(Panel);

impl Widget for Panel {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn debug_name(&self) -> &str {
        "Panel"
    }

    fn create_renderer(self: Rc<Self>, theme: &Theme) -> Box<dyn Renderer> {
        Box::new(PanelRenderer::new(&self, theme))
    }

    fn attach(&self, refresh: &RefreshHandle) {
        if !self.refresh.attach(refresh) {
            return;
        }
        for child in self.children() {
            if let Some(widget) = child.as_widget() {
                widget.attach(refresh);
            }
        }
    }
}

fn stack_min_size(children: &[CanvasObject], spacing: Spacing) -> Size<f32> {
    let mut width: f32 = 0.0;
    let mut height = 0.0;
    let mut shown = 0;
    for child in children.iter().map(CanvasObject::geometry) {
        if !child.visible() {
            continue;
        }
        let min = child.min_size();
        width = width.max(min.width);
        height += min.height;
        shown += 1;
    }
    if shown > 1 {
        height += spacing.inner_padding * (shown - 1) as f32;
    }
    Size::new(width + spacing.padding * 2.0, height + spacing.padding * 2.0)
}

struct PanelRenderer {
    panel: Weak<Panel>,
    objects: Vec<CanvasObject>,
    spacing: Spacing,
    background: Color,
}

impl PanelRenderer {
    fn new(panel: &Rc<Panel>, theme: &Theme) -> Self {
        Self {
            panel: Rc::downgrade(panel),
            objects: panel.children(),
            spacing: theme.spacing,
            background: theme.colors.background,
        }
    }
}

impl Renderer for PanelRenderer {
    fn layout(&mut self, size: Size<f32>) {
        let pad = self.spacing.padding;
        let inner_width = size.inset(pad).width;
        let mut y = pad;
        for child in self.objects.iter().map(CanvasObject::geometry) {
            if !child.visible() {
                continue;
            }
            let height = child.min_size().height;
            child.move_to(Pos::new(pad, y));
            child.resize(Size::new(inner_width, height));
            y += height + self.spacing.inner_padding;
        }
    }

    fn min_size(&self) -> Size<f32> {
        match self.panel.upgrade() {
            Some(panel) => panel.min_size(),
            None => stack_min_size(&self.objects, self.spacing),
        }
    }

    fn refresh(&mut self) {
        if let Some(panel) = self.panel.upgrade() {
            self.objects = panel.children();
        }
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.spacing = theme.spacing;
        self.background = theme.colors.background;
    }

    fn background_color(&self) -> Color {
        self.background
    }

    fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }
}
