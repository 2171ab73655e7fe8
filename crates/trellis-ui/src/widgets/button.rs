use std::cell::RefCell;
use std::rc::{Rc, Weak};

use trellis_core::geometry::{Pos, Size};

use crate::canvas_object::{CanvasObject, Rectangle, Text};
use crate::color::Color;
use crate::geometry::{Geometry, GeometryState, forward_geometry};
use crate::refresh::{RefreshHandle, RefreshSlot};
use crate::theme::Theme;
use crate::theme_dispatcher::ThemeDispatcher;
use crate::widget::{Renderer, Widget, WidgetId};

type TappedCallback = Box<dyn Fn()>;

/// A push button with a text label and an optional leading icon glyph.
pub struct Button {
    id: WidgetId,
    geometry: GeometryState,
    text: RefCell<String>,
    icon: RefCell<Option<String>>,
    on_tapped: RefCell<Option<TappedCallback>>,
    refresh: RefreshSlot,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: WidgetId::next(),
            geometry: GeometryState::new(),
            text: RefCell::new(text.into()),
            icon: RefCell::new(None),
            on_tapped: RefCell::new(None),
            refresh: RefreshSlot::new(),
        })
    }

    pub fn with_icon(text: impl Into<String>, icon: impl Into<String>) -> Rc<Self> {
        let button = Self::new(text);
        *button.icon.borrow_mut() = Some(icon.into());
        button
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        if *self.text.borrow() == text {
            return;
        }
        *self.text.borrow_mut() = text;
        self.refresh.request(self.id);
    }

    pub fn icon(&self) -> Option<String> {
        self.icon.borrow().clone()
    }

    /// Set or clear the icon glyph.
    pub fn set_icon(&self, icon: Option<String>) {
        if *self.icon.borrow() == icon {
            return;
        }
        *self.icon.borrow_mut() = icon;
        self.refresh.request(self.id);
    }

    pub fn on_tapped(&self, callback: impl Fn() + 'static) {
        *self.on_tapped.borrow_mut() = Some(Box::new(callback));
    }

    /// Run the tap callback, as a click would.
    pub fn tap(&self) {
        if let Some(callback) = self.on_tapped.borrow().as_ref() {
            callback();
        }
    }

    fn measure(&self) -> Size<f32> {
        let theme = ThemeDispatcher::current_or_default();
        button_min_size(
            &self.text.borrow(),
            self.icon.borrow().as_deref(),
            theme.typography.text_size,
            theme.spacing.padding,
        )
    }
}

forward_geometry!(Button);

impl Widget for Button {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn debug_name(&self) -> &str {
        "Button"
    }

    fn create_renderer(self: Rc<Self>, theme: &Theme) -> Box<dyn Renderer> {
        Box::new(ButtonRenderer::new(&self, theme))
    }

    fn attach(&self, refresh: &RefreshHandle) {
        self.refresh.attach(refresh);
    }
}

fn button_min_size(text: &str, icon: Option<&str>, text_size: f32, padding: f32) -> Size<f32> {
    let label = Text::measure_str(text, text_size);
    let mut width = padding * 2.0 + label.width;
    if let Some(icon) = icon {
        width += Text::measure_str(icon, text_size).width + padding / 2.0;
    }
    Size::new(width, padding * 2.0 + label.height)
}

struct ButtonRenderer {
    button: Weak<Button>,
    background: Rc<Rectangle>,
    icon: Option<Rc<Text>>,
    label: Rc<Text>,
    objects: Vec<CanvasObject>,
    text_color: Color,
    text_size: f32,
    padding: f32,
}

impl ButtonRenderer {
    fn new(button: &Rc<Button>, theme: &Theme) -> Self {
        let mut renderer = Self {
            button: Rc::downgrade(button),
            background: Rectangle::new(theme.colors.primary),
            icon: None,
            label: Text::new(button.text(), theme.colors.text_primary, theme.typography.text_size),
            objects: Vec::new(),
            text_color: theme.colors.text_primary,
            text_size: theme.typography.text_size,
            padding: theme.spacing.padding,
        };
        renderer.apply_theme(theme);
        renderer
    }

    fn rebuild_objects(&mut self) {
        self.objects.clear();
        self.objects.push(self.background.clone().into());
        if let Some(icon) = &self.icon {
            self.objects.push(icon.clone().into());
        }
        self.objects.push(self.label.clone().into());
    }
}

impl Renderer for ButtonRenderer {
    fn layout(&mut self, size: Size<f32>) {
        self.background.move_to(Pos::ORIGIN);
        self.background.resize(size);

        let label_size = self.label.min_size();
        let y = ((size.height - label_size.height) / 2.0).max(0.0);
        let mut x = self.padding;

        if let Some(icon) = &self.icon {
            let icon_size = icon.min_size();
            icon.move_to(Pos::new(x, y));
            icon.resize(icon_size);
            x += icon_size.width + self.padding / 2.0;
        }

        self.label.move_to(Pos::new(x, y));
        self.label
            .resize(Size::new(size.width - x - self.padding, label_size.height));
    }

    fn min_size(&self) -> Size<f32> {
        let icon = self.icon.as_ref().map(|icon| icon.text());
        button_min_size(
            &self.label.text(),
            icon.as_deref(),
            self.text_size,
            self.padding,
        )
    }

    fn refresh(&mut self) {
        let Some(button) = self.button.upgrade() else {
            return;
        };
        self.label.set_text(&button.text.borrow());

        let glyph = button.icon.borrow().clone();
        let structural = match (glyph, self.icon.is_some()) {
            (Some(glyph), true) => {
                if let Some(icon) = &self.icon {
                    icon.set_text(&glyph);
                }
                false
            }
            (Some(glyph), false) => {
                self.icon = Some(Text::new(glyph, self.text_color, self.text_size));
                true
            }
            (None, true) => {
                self.icon = None;
                true
            }
            (None, false) => false,
        };
        if structural || self.objects.is_empty() {
            self.rebuild_objects();
        }
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.text_color = theme.colors.text_primary;
        self.text_size = theme.typography.text_size;
        self.padding = theme.spacing.padding;

        self.background.set_fill(theme.colors.primary);
        self.background.set_corner_radius(theme.spacing.inner_padding);
        for text in self.icon.iter().chain(std::iter::once(&self.label)) {
            text.set_color(self.text_color);
            text.set_text_size(self.text_size);
        }
        self.refresh();
    }

    fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_objects_without_icon() {
        let button = Button::new("OK");
        let renderer = button.clone().create_renderer(&Theme::light());
        let kinds: Vec<&str> = renderer.objects().iter().map(CanvasObject::kind).collect();
        assert_eq!(kinds, vec!["rectangle", "text"]);
    }

    #[test]
    fn test_icon_presence_is_structural() {
        let button = Button::new("Save");
        let mut renderer = button.clone().create_renderer(&Theme::light());
        let label = renderer.objects()[1].clone();

        button.set_icon(Some("+".to_string()));
        renderer.refresh();
        assert_eq!(renderer.objects().len(), 3);
        assert!(renderer.objects()[2].ptr_eq(&label));
        let icon = renderer.objects()[1].clone();

        // Changing the glyph keeps the icon object.
        button.set_icon(Some("*".to_string()));
        renderer.refresh();
        assert!(renderer.objects()[1].ptr_eq(&icon));

        button.set_icon(None);
        renderer.refresh();
        assert_eq!(renderer.objects().len(), 2);
        assert!(renderer.objects()[1].ptr_eq(&label));
    }

    #[test]
    fn test_text_refresh_is_in_place() {
        let button = Button::new("Save");
        let mut renderer = button.clone().create_renderer(&Theme::light());
        let CanvasObject::Text(label) = renderer.objects()[1].clone() else {
            panic!("second object should be the label");
        };

        button.set_text("Saved");
        renderer.refresh();
        assert_eq!(label.text(), "Saved");
    }

    #[test]
    fn test_tap_runs_callback() {
        let button = Button::new("Go");
        let taps = Rc::new(Cell::new(0));
        let counter = taps.clone();
        button.on_tapped(move || counter.set(counter.get() + 1));
        button.tap();
        button.tap();
        assert_eq!(taps.get(), 2);
    }

    #[test]
    fn test_icon_widens_min_size() {
        let plain = Button::new("Go");
        let with_icon = Button::with_icon("Go", "+");
        assert!(with_icon.min_size().width > plain.min_size().width);
        assert_eq!(with_icon.min_size().height, plain.min_size().height);
    }
}
