//! Composition traversal.
//!
//! Walks the object tree back to front and flattens it into a [`DrawList`].
//! Primitives become draw commands directly. A widget is expanded through
//! its cached renderer: the renderer is laid out to the widget's size, its
//! background is emitted, then its objects are painted on top in order.
//!
//! Positions are relative to the parent widget, so the traversal carries an
//! absolute origin down the tree.
//!
//! A renderer whose objects lead back to a widget that is already being
//! expanded would recurse forever. The traversal keeps the chain of widgets
//! it is inside of; when a child widget is already on that chain the subtree
//! rooted at the repeated widget is dropped from the list, a
//! [`StructuralError`] is recorded, and painting resumes with its siblings.
//!
//! With a refresh handle, every widget the traversal expands is attached to
//! it, including widgets a renderer exposes without going through a
//! container's `attach`.

use trellis_core::math::Vec2;
use trellis_core::profiling::{profile_function, profile_scope};

use crate::cache::RendererCache;
use crate::canvas_object::CanvasObject;
use crate::draw_list::{DrawCommand, DrawList, LineCommand, QuadCommand, TextCommand};
use crate::error::StructuralError;
use crate::refresh::RefreshHandle;
use crate::widget::{WidgetId, WidgetRef};

/// Counters for one paint pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Widgets expanded through their renderer
    pub widgets: usize,
    /// Primitive objects emitted
    pub primitives: usize,
    /// Objects skipped because they were hidden
    pub hidden: usize,
    /// Subtrees dropped because of a structural cycle
    pub errors: usize,
}

/// One paint pass over a set of root objects.
pub struct Painter<'a> {
    cache: &'a mut RendererCache,
    list: DrawList,
    path: Vec<WidgetId>,
    stats: PaintStats,
    refresh: Option<RefreshHandle>,
}

impl<'a> Painter<'a> {
    pub fn new(cache: &'a mut RendererCache) -> Self {
        Self {
            cache,
            list: DrawList::new(),
            path: Vec::new(),
            stats: PaintStats::default(),
            refresh: None,
        }
    }

    /// Attach every expanded widget to `refresh`.
    pub fn with_refresh(mut self, refresh: RefreshHandle) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Paint `roots` in order, then return the draw list and counters.
    pub fn paint(mut self, roots: &[CanvasObject]) -> (DrawList, PaintStats) {
        profile_function!();

        for root in roots {
            if let Err(err) = self.paint_object(root, Vec2::ZERO) {
                self.record(err);
            }
        }
        (self.list, self.stats)
    }

    fn paint_object(&mut self, object: &CanvasObject, origin: Vec2) -> Result<(), StructuralError> {
        let geometry = object.geometry();
        if !geometry.visible() {
            self.stats.hidden += 1;
            return Ok(());
        }

        let position = origin + geometry.position().to_vec2();
        let size = geometry.size().to_vec2();
        let owner = self.path.last().copied();

        match object {
            CanvasObject::Rectangle(rect) => {
                self.stats.primitives += 1;
                self.list.push(DrawCommand::Quad(QuadCommand {
                    owner,
                    position,
                    size,
                    fill: rect.fill(),
                    stroke: rect.stroke(),
                    stroke_width: rect.stroke_width(),
                    corner_radius: rect.corner_radius(),
                }));
            }
            CanvasObject::Text(text) => {
                self.stats.primitives += 1;
                self.list.push(DrawCommand::Text(TextCommand {
                    owner,
                    position,
                    size,
                    text: text.text(),
                    color: text.color(),
                    text_size: text.text_size(),
                }));
            }
            CanvasObject::Line(line) => {
                self.stats.primitives += 1;
                self.list.push(DrawCommand::Line(LineCommand {
                    owner,
                    from: position,
                    to: position + size,
                    color: line.color(),
                    width: line.width(),
                }));
            }
            CanvasObject::Widget(widget) => return self.paint_widget(widget, position),
        }
        Ok(())
    }

    fn paint_widget(&mut self, widget: &WidgetRef, position: Vec2) -> Result<(), StructuralError> {
        let id = widget.id();
        let mark = self.list.len();

        self.path.push(id);
        let result = self.expand(widget, position);
        self.path.pop();

        match result {
            // This widget is the one that came back around: drop its subtree.
            Err(err) if err.repeated == id => {
                self.list.truncate(mark);
                self.record(err);
                Ok(())
            }
            other => other,
        }
    }

    fn expand(&mut self, widget: &WidgetRef, position: Vec2) -> Result<(), StructuralError> {
        profile_scope!("expand_widget");

        let id = widget.id();
        if let Some(refresh) = &self.refresh {
            widget.attach(refresh);
        }
        let renderer = self.cache.get(widget);
        renderer.layout(widget.size());
        self.stats.widgets += 1;

        let background = renderer.background_color();
        if !background.is_transparent() {
            self.list.push(DrawCommand::Quad(QuadCommand::filled(
                Some(id),
                position,
                widget.size().to_vec2(),
                background,
            )));
        }

        let objects = renderer.objects();
        if let Some(repeated) = objects
            .iter()
            .filter_map(CanvasObject::as_widget)
            .map(|child| child.id())
            .find(|child| self.path.contains(child))
        {
            return Err(StructuralError {
                widget: id,
                repeated,
                path: self.path.clone(),
            });
        }

        for object in &objects {
            self.paint_object(object, position)?;
        }
        Ok(())
    }

    fn record(&mut self, err: StructuralError) {
        tracing::warn!("Dropping subtree of {} from the frame: {}", err.repeated, err);
        self.stats.errors += 1;
        self.list.push_error(err);
    }
}

/// Paint `roots` with renderers from `cache`.
pub fn paint(cache: &mut RendererCache, roots: &[CanvasObject]) -> (DrawList, PaintStats) {
    Painter::new(cache).paint(roots)
}
