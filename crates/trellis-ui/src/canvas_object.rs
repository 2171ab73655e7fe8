//! Drawable objects: concrete primitives plus nested widgets.
//!
//! Renderers compose their widget's appearance out of [`CanvasObject`]s. The
//! primitives here carry only what the paint traversal needs to emit a draw
//! command; shaping text or rasterizing shapes is left to a backend.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use trellis_core::geometry::Size;

use crate::color::Color;
use crate::geometry::{Geometry, GeometryState, forward_geometry};
use crate::widget::{Widget, WidgetRef};

/// Horizontal advance per character, as a fraction of the text size.
pub const CHAR_ADVANCE: f32 = 0.5;
/// Line height, as a fraction of the text size.
pub const LINE_HEIGHT: f32 = 1.25;

/// A filled and/or stroked rectangle.
#[derive(Debug)]
pub struct Rectangle {
    geometry: GeometryState,
    fill: Cell<Color>,
    stroke: Cell<Color>,
    stroke_width: Cell<f32>,
    corner_radius: Cell<f32>,
}

impl Rectangle {
    pub fn new(fill: Color) -> Rc<Self> {
        Rc::new(Self {
            geometry: GeometryState::new(),
            fill: Cell::new(fill),
            stroke: Cell::new(Color::TRANSPARENT),
            stroke_width: Cell::new(0.0),
            corner_radius: Cell::new(0.0),
        })
    }

    pub fn fill(&self) -> Color {
        self.fill.get()
    }

    pub fn set_fill(&self, color: Color) {
        self.fill.set(color);
    }

    pub fn stroke(&self) -> Color {
        self.stroke.get()
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width.get()
    }

    pub fn set_stroke(&self, color: Color, width: f32) {
        self.stroke.set(color);
        self.stroke_width.set(width.max(0.0));
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius.get()
    }

    pub fn set_corner_radius(&self, radius: f32) {
        self.corner_radius.set(radius.max(0.0));
    }

    fn measure(&self) -> Size<f32> {
        Size::ZERO
    }
}

forward_geometry!(Rectangle);

/// A single line of text.
#[derive(Debug)]
pub struct Text {
    geometry: GeometryState,
    text: RefCell<String>,
    color: Cell<Color>,
    text_size: Cell<f32>,
}

impl Text {
    pub fn new(text: impl Into<String>, color: Color, text_size: f32) -> Rc<Self> {
        Rc::new(Self {
            geometry: GeometryState::new(),
            text: RefCell::new(text.into()),
            color: Cell::new(color),
            text_size: Cell::new(text_size),
        })
    }

    /// Fixed-advance measurement used in place of real shaping.
    pub fn measure_str(text: &str, text_size: f32) -> Size<f32> {
        let chars = text.chars().count() as f32;
        Size::new(chars * text_size * CHAR_ADVANCE, text_size * LINE_HEIGHT)
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: &str) {
        let mut current = self.text.borrow_mut();
        if current.as_str() != text {
            current.clear();
            current.push_str(text);
        }
    }

    pub fn color(&self) -> Color {
        self.color.get()
    }

    pub fn set_color(&self, color: Color) {
        self.color.set(color);
    }

    pub fn text_size(&self) -> f32 {
        self.text_size.get()
    }

    pub fn set_text_size(&self, size: f32) {
        self.text_size.set(size.max(0.0));
    }

    fn measure(&self) -> Size<f32> {
        Self::measure_str(&self.text.borrow(), self.text_size.get())
    }
}

forward_geometry!(Text);

/// A straight line from the top-left to the bottom-right of its bounds.
#[derive(Debug)]
pub struct Line {
    geometry: GeometryState,
    color: Cell<Color>,
    width: Cell<f32>,
}

impl Line {
    pub fn new(color: Color, width: f32) -> Rc<Self> {
        Rc::new(Self {
            geometry: GeometryState::new(),
            color: Cell::new(color),
            width: Cell::new(width.max(0.0)),
        })
    }

    pub fn color(&self) -> Color {
        self.color.get()
    }

    pub fn set_color(&self, color: Color) {
        self.color.set(color);
    }

    pub fn width(&self) -> f32 {
        self.width.get()
    }

    fn measure(&self) -> Size<f32> {
        Size::ZERO
    }
}

forward_geometry!(Line);

/// Anything a renderer can list in its objects: a primitive, or a nested
/// widget that the paint traversal expands through its own renderer.
///
/// Cloning shares the underlying object; identity is pointer identity.
#[derive(Clone)]
pub enum CanvasObject {
    Rectangle(Rc<Rectangle>),
    Text(Rc<Text>),
    Line(Rc<Line>),
    Widget(WidgetRef),
}

impl CanvasObject {
    /// Wrap a concrete widget.
    pub fn widget<W: Widget>(widget: Rc<W>) -> Self {
        CanvasObject::Widget(widget)
    }

    pub fn geometry(&self) -> &dyn Geometry {
        match self {
            CanvasObject::Rectangle(rect) => &**rect,
            CanvasObject::Text(text) => &**text,
            CanvasObject::Line(line) => &**line,
            CanvasObject::Widget(widget) => &**widget,
        }
    }

    pub fn as_widget(&self) -> Option<&WidgetRef> {
        match self {
            CanvasObject::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    /// Whether both refer to the same object.
    pub fn ptr_eq(&self, other: &CanvasObject) -> bool {
        match (self, other) {
            (CanvasObject::Rectangle(a), CanvasObject::Rectangle(b)) => Rc::ptr_eq(a, b),
            (CanvasObject::Text(a), CanvasObject::Text(b)) => Rc::ptr_eq(a, b),
            (CanvasObject::Line(a), CanvasObject::Line(b)) => Rc::ptr_eq(a, b),
            (CanvasObject::Widget(a), CanvasObject::Widget(b)) => a.id() == b.id(),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CanvasObject::Rectangle(_) => "rectangle",
            CanvasObject::Text(_) => "text",
            CanvasObject::Line(_) => "line",
            CanvasObject::Widget(_) => "widget",
        }
    }
}

impl fmt::Debug for CanvasObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasObject::Rectangle(rect) => f.debug_tuple("Rectangle").field(rect).finish(),
            CanvasObject::Text(text) => f.debug_tuple("Text").field(text).finish(),
            CanvasObject::Line(line) => f.debug_tuple("Line").field(line).finish(),
            CanvasObject::Widget(widget) => f
                .debug_tuple("Widget")
                .field(&widget.debug_name())
                .field(&widget.id())
                .finish(),
        }
    }
}

impl From<Rc<Rectangle>> for CanvasObject {
    fn from(rect: Rc<Rectangle>) -> Self {
        CanvasObject::Rectangle(rect)
    }
}

impl From<Rc<Text>> for CanvasObject {
    fn from(text: Rc<Text>) -> Self {
        CanvasObject::Text(text)
    }
}

impl From<Rc<Line>> for CanvasObject {
    fn from(line: Rc<Line>) -> Self {
        CanvasObject::Line(line)
    }
}

impl From<WidgetRef> for CanvasObject {
    fn from(widget: WidgetRef) -> Self {
        CanvasObject::Widget(widget)
    }
}
