//! Backend-agnostic paint output.
//!
//! The paint traversal flattens the object tree into a [`DrawList`]: draw
//! commands with absolute positions in back-to-front order. A backend walks
//! the list front to back of the `Vec` and paints each command over the
//! previous ones.

use trellis_core::math::Vec2;

use crate::color::Color;
use crate::error::{StructuralError, UiResult};
use crate::widget::WidgetId;

/// High-level draw command for one primitive or widget background.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw a filled and/or stroked rectangle
    Quad(QuadCommand),
    /// Draw a line of text
    Text(TextCommand),
    /// Draw a straight line
    Line(LineCommand),
}

impl DrawCommand {
    /// Widget whose renderer produced this command, `None` for root
    /// primitives.
    pub fn owner(&self) -> Option<WidgetId> {
        match self {
            DrawCommand::Quad(q) => q.owner,
            DrawCommand::Text(t) => t.owner,
            DrawCommand::Line(l) => l.owner,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            DrawCommand::Quad(q) => q.position,
            DrawCommand::Text(t) => t.position,
            DrawCommand::Line(l) => l.from,
        }
    }
}

/// Command to draw a quad (rectangle).
#[derive(Debug, Clone, PartialEq)]
pub struct QuadCommand {
    pub owner: Option<WidgetId>,
    /// Position in canvas space
    pub position: Vec2,
    pub size: Vec2,
    pub fill: Color,
    /// Stroke color (transparent = no stroke)
    pub stroke: Color,
    pub stroke_width: f32,
    /// Border radius for rounded corners (0 = sharp)
    pub corner_radius: f32,
}

impl QuadCommand {
    /// Create a new filled quad command.
    pub fn filled(owner: Option<WidgetId>, position: Vec2, size: Vec2, fill: Color) -> Self {
        Self {
            owner,
            position,
            size,
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            corner_radius: 0.0,
        }
    }
}

/// Command to draw a line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub owner: Option<WidgetId>,
    /// Top-left of the text box in canvas space
    pub position: Vec2,
    /// Box the text is laid out in
    pub size: Vec2,
    pub text: String,
    pub color: Color,
    pub text_size: f32,
}

/// Command to draw a straight line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCommand {
    pub owner: Option<WidgetId>,
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
    pub width: f32,
}

/// Flattened output of one paint pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    errors: Vec<StructuralError>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Drop commands emitted after `len`, used to discard a failed subtree.
    pub fn truncate(&mut self, len: usize) {
        self.commands.truncate(len);
    }

    pub fn push_error(&mut self, error: StructuralError) {
        self.errors.push(error);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Structural errors raised during the pass, one per dropped subtree.
    pub fn errors(&self) -> &[StructuralError] {
        &self.errors
    }

    /// `Err` with the first structural error of the pass, if there was one.
    pub fn check(&self) -> UiResult<()> {
        match self.errors.first() {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }

    /// Commands produced by `owner`'s renderer.
    pub fn commands_for(&self, owner: WidgetId) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(move |command| command.owner() == Some(owner))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.errors.clear();
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(owner: Option<WidgetId>, x: f32) -> DrawCommand {
        DrawCommand::Quad(QuadCommand::filled(
            owner,
            Vec2::new(x, 0.0),
            Vec2::new(10.0, 10.0),
            Color::RED,
        ))
    }

    #[test]
    fn test_draw_list_creation() {
        let list = DrawList::with_capacity(16);
        assert!(list.is_empty());
        assert!(list.errors().is_empty());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut list = DrawList::new();
        list.push(quad(None, 1.0));
        list.push(quad(None, 2.0));
        list.push(quad(None, 3.0));
        let xs: Vec<f32> = list.iter().map(|c| c.position().x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_truncate_discards_tail() {
        let mut list = DrawList::new();
        list.push(quad(None, 1.0));
        let mark = list.len();
        list.push(quad(None, 2.0));
        list.push(quad(None, 3.0));
        list.truncate(mark);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_check_reports_first_error() {
        let mut list = DrawList::new();
        assert!(list.check().is_ok());

        let err = StructuralError {
            widget: WidgetId::next(),
            repeated: WidgetId::next(),
            path: Vec::new(),
        };
        list.push_error(err.clone());
        assert_eq!(list.check(), Err(crate::error::UiError::Structural(err)));
    }

    #[test]
    fn test_commands_for_owner() {
        let owner = WidgetId::next();
        let mut list = DrawList::new();
        list.push(quad(Some(owner), 1.0));
        list.push(quad(None, 2.0));
        list.push(quad(Some(owner), 3.0));
        assert_eq!(list.commands_for(owner).count(), 2);
    }
}
