use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use trellis_core::geometry::{Pos, Size};

use crate::canvas_object::{CanvasObject, LINE_HEIGHT, Rectangle, Text};
use crate::color::Color;
use crate::geometry::{Geometry, GeometryState, forward_geometry};
use crate::refresh::{RefreshHandle, RefreshSlot};
use crate::theme::{ColorPalette, Theme};
use crate::theme_dispatcher::ThemeDispatcher;
use crate::widget::{Renderer, Widget, WidgetId};

type ChangedCallback = Box<dyn Fn(bool)>;

/// A checkbox: a square box followed by a label.
pub struct Toggle {
    id: WidgetId,
    geometry: GeometryState,
    checked: Cell<bool>,
    label: RefCell<String>,
    on_changed: RefCell<Option<ChangedCallback>>,
    refresh: RefreshSlot,
}

impl Toggle {
    pub fn new(label: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: WidgetId::next(),
            geometry: GeometryState::new(),
            checked: Cell::new(false),
            label: RefCell::new(label.into()),
            on_changed: RefCell::new(None),
            refresh: RefreshSlot::new(),
        })
    }

    pub fn checked(&self) -> bool {
        self.checked.get()
    }

    /// Set the checked state, notifying the change callback and scheduling a
    /// refresh when it actually changed.
    pub fn set_checked(&self, checked: bool) {
        if self.checked.replace(checked) == checked {
            return;
        }
        self.refresh.request(self.id);
        if let Some(callback) = self.on_changed.borrow().as_ref() {
            callback(checked);
        }
    }

    /// Flip the checked state, as a click would.
    pub fn toggle(&self) {
        self.set_checked(!self.checked());
    }

    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        let label = label.into();
        if *self.label.borrow() == label {
            return;
        }
        *self.label.borrow_mut() = label;
        self.refresh.request(self.id);
    }

    /// Called with the new state every time it changes.
    pub fn on_changed(&self, callback: impl Fn(bool) + 'static) {
        *self.on_changed.borrow_mut() = Some(Box::new(callback));
    }

    fn measure(&self) -> Size<f32> {
        ToggleMetrics::from_theme(&ThemeDispatcher::current_or_default())
            .min_size(&self.label.borrow())
    }
}

forward_geometry!(Toggle);

impl Widget for Toggle {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn debug_name(&self) -> &str {
        "Toggle"
    }

    fn create_renderer(self: Rc<Self>, theme: &Theme) -> Box<dyn Renderer> {
        Box::new(ToggleRenderer::new(&self, theme))
    }

    fn attach(&self, refresh: &RefreshHandle) {
        self.refresh.attach(refresh);
    }
}

#[derive(Debug, Clone, Copy)]
struct ToggleMetrics {
    text_size: f32,
    padding: f32,
}

impl ToggleMetrics {
    fn from_theme(theme: &Theme) -> Self {
        Self {
            text_size: theme.typography.text_size,
            padding: theme.spacing.inner_padding,
        }
    }

    fn box_side(&self) -> f32 {
        self.text_size * LINE_HEIGHT
    }

    fn min_size(&self, label: &str) -> Size<f32> {
        let text = Text::measure_str(label, self.text_size);
        let side = self.box_side();
        Size::new(
            self.padding * 3.0 + side + text.width,
            self.padding * 2.0 + side.max(text.height),
        )
    }
}

struct ToggleRenderer {
    toggle: Weak<Toggle>,
    check_box: Rc<Rectangle>,
    label: Rc<Text>,
    objects: Vec<CanvasObject>,
    palette: ColorPalette,
    metrics: ToggleMetrics,
}

impl ToggleRenderer {
    fn new(toggle: &Rc<Toggle>, theme: &Theme) -> Self {
        let check_box = Rectangle::new(Color::TRANSPARENT);
        let label = Text::new(toggle.label(), Color::BLACK, theme.typography.text_size);
        let mut renderer = Self {
            toggle: Rc::downgrade(toggle),
            objects: vec![check_box.clone().into(), label.clone().into()],
            check_box,
            label,
            palette: theme.colors.clone(),
            metrics: ToggleMetrics::from_theme(theme),
        };
        renderer.apply_theme(theme);
        renderer
    }

    fn box_fill(&self, checked: bool) -> Color {
        if checked {
            self.palette.primary
        } else {
            self.palette.surface
        }
    }
}

impl Renderer for ToggleRenderer {
    fn layout(&mut self, size: Size<f32>) {
        let pad = self.metrics.padding;
        let side = self.metrics.box_side();
        let label_size = self.label.min_size();

        self.check_box
            .move_to(Pos::new(pad, ((size.height - side) / 2.0).max(0.0)));
        self.check_box.resize(Size::new(side, side));

        let label_x = pad * 2.0 + side;
        self.label.move_to(Pos::new(
            label_x,
            ((size.height - label_size.height) / 2.0).max(0.0),
        ));
        self.label
            .resize(Size::new(size.width - label_x - pad, label_size.height));
    }

    fn min_size(&self) -> Size<f32> {
        self.metrics.min_size(&self.label.text())
    }

    fn refresh(&mut self) {
        let Some(toggle) = self.toggle.upgrade() else {
            return;
        };
        self.check_box.set_fill(self.box_fill(toggle.checked()));
        self.label.set_text(&toggle.label.borrow());
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.palette = theme.colors.clone();
        self.metrics = ToggleMetrics::from_theme(theme);
        self.check_box.set_stroke(self.palette.border, 1.0);
        self.label.set_color(self.palette.text_primary);
        self.label.set_text_size(self.metrics.text_size);
        self.refresh();
    }

    fn background_color(&self) -> Color {
        self.palette.surface
    }

    fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }
}
