//! Trellis UI - renderer lifecycle, caching and paint traversal
//!
//! This crate is the protocol between a retained-mode host and the widgets
//! consumers write for it:
//! - [`Widget`] / [`Renderer`] capability traits for custom components
//! - [`RendererCache`] owning one live renderer per widget, created lazily
//! - a composition traversal flattening the tree into a [`DrawList`]
//! - [`ThemeDispatcher`] broadcasting theme changes to live renderers
//! - [`RefreshScheduler`] coalescing state changes into one refresh per frame
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_ui::widgets::{Button, Panel, Toggle};
//! use trellis_ui::{Canvas, CanvasConfig, CanvasObject, Size, Theme, ThemeDispatcher};
//!
//! ThemeDispatcher::init(Theme::light()).unwrap();
//!
//! let toggle = Toggle::new("Dark mode");
//! let panel = Panel::with_children(vec![
//!     CanvasObject::widget(toggle.clone()),
//!     CanvasObject::widget(Button::new("Apply")),
//! ]);
//!
//! let mut canvas = Canvas::new(CanvasConfig::default().with_size(Size::new(320.0, 240.0)));
//! canvas.add(CanvasObject::widget(panel));
//!
//! // In the rendering loop:
//! let frame = canvas.paint();
//! frame.draw_list.check().unwrap();
//!
//! toggle.set_checked(true);
//! ThemeDispatcher::broadcast(Theme::dark()).unwrap();
//! assert_eq!(canvas.paint().refreshed, 1);
//!
//! ThemeDispatcher::shutdown();
//! ```

pub mod cache;
pub mod canvas;
pub mod canvas_object;
pub mod color;
pub mod draw_list;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod refresh;
pub mod renderer;
pub mod theme;
pub mod theme_dispatcher;
pub mod widget;
pub mod widgets;

pub use cache::RendererCache;
pub use canvas::{Canvas, CanvasConfig, Frame};
pub use canvas_object::{CanvasObject, Line, Rectangle, Text};
pub use color::Color;
pub use draw_list::{DrawCommand, DrawList, LineCommand, QuadCommand, TextCommand};
pub use error::{DestroyError, StructuralError, UiError, UiResult};
pub use geometry::{Geometry, GeometryState};
pub use paint::{PaintStats, Painter};
pub use refresh::{RefreshHandle, RefreshScheduler, RefreshSlot};
pub use renderer::{RendererHandle, RendererId, WeakRendererHandle};
pub use theme::{ColorPalette, ColorRole, Spacing, Theme, ThemeBuilder, Typography};
pub use theme_dispatcher::ThemeDispatcher;
pub use widget::{Renderer, Widget, WidgetId, WidgetRef};

// Re-export geometry value types
pub use trellis_core::geometry::{Pos, Size};
pub use trellis_core::math::Vec2;
