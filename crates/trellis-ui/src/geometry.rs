//! Geometry and visibility shared by every drawable node.
//!
//! Widgets and primitives embed a [`GeometryState`] by value and forward the
//! [`Geometry`] methods to it. State lives in `Cell`s so that setters take
//! `&self`: nodes are shared through `Rc` between their owner and the
//! renderers that position them.

use std::cell::Cell;

use trellis_core::geometry::{Pos, Size};

/// Position, size and visibility of a drawable node.
pub trait Geometry {
    fn size(&self) -> Size<f32>;

    /// Set the size. Negative extents are clamped to zero. No layout is
    /// triggered.
    fn resize(&self, size: Size<f32>);

    fn position(&self) -> Pos<f32>;

    fn move_to(&self, position: Pos<f32>);

    /// Minimum size needed to show the content unclipped.
    ///
    /// Pure function of the node's current content and style.
    fn min_size(&self) -> Size<f32>;

    fn visible(&self) -> bool;

    /// Only flips the visibility flag; skipping hidden nodes is up to the
    /// paint traversal.
    fn show(&self);

    fn hide(&self);
}

/// Composable geometry component held by value inside widgets and primitives.
#[derive(Debug)]
pub struct GeometryState {
    position: Cell<Pos<f32>>,
    size: Cell<Size<f32>>,
    visible: Cell<bool>,
}

impl GeometryState {
    /// A visible node at the origin with zero size.
    pub fn new() -> Self {
        Self {
            position: Cell::new(Pos::ORIGIN),
            size: Cell::new(Size::ZERO),
            visible: Cell::new(true),
        }
    }

    pub fn size(&self) -> Size<f32> {
        self.size.get()
    }

    /// Returns `true` if the stored size changed.
    pub fn resize(&self, size: Size<f32>) -> bool {
        let size = size.clamped();
        if self.size.get() == size {
            return false;
        }
        self.size.set(size);
        true
    }

    pub fn position(&self) -> Pos<f32> {
        self.position.get()
    }

    /// Returns `true` if the stored position changed.
    pub fn move_to(&self, position: Pos<f32>) -> bool {
        if self.position.get() == position {
            return false;
        }
        self.position.set(position);
        true
    }

    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    pub fn show(&self) {
        self.visible.set(true);
    }

    pub fn hide(&self) {
        self.visible.set(false);
    }
}

impl Default for GeometryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Implement [`Geometry`] by forwarding to a `geometry: GeometryState` field.
///
/// The type must provide an inherent `fn measure(&self) -> Size<f32>` that
/// backs `min_size`.
macro_rules! forward_geometry {
    ($ty:ty) => {
        impl $crate::geometry::Geometry for $ty {
            fn size(&self) -> ::trellis_core::geometry::Size<f32> {
                self.geometry.size()
            }

            fn resize(&self, size: ::trellis_core::geometry::Size<f32>) {
                self.geometry.resize(size);
            }

            fn position(&self) -> ::trellis_core::geometry::Pos<f32> {
                self.geometry.position()
            }

            fn move_to(&self, position: ::trellis_core::geometry::Pos<f32>) {
                self.geometry.move_to(position);
            }

            fn min_size(&self) -> ::trellis_core::geometry::Size<f32> {
                self.measure()
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
    };
}

pub(crate) use forward_geometry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_is_idempotent() {
        let state = GeometryState::new();
        assert!(state.resize(Size::new(10.0, 20.0)));
        assert!(!state.resize(Size::new(10.0, 20.0)));
        assert_eq!(state.size(), Size::new(10.0, 20.0));
    }

    #[test]
    fn test_negative_size_clamps_to_zero() {
        let state = GeometryState::new();
        state.resize(Size::new(-4.0, 8.0));
        assert_eq!(state.size(), Size::new(0.0, 8.0));
    }

    #[test]
    fn test_move_is_idempotent() {
        let state = GeometryState::new();
        assert!(state.move_to(Pos::new(3.0, 4.0)));
        assert!(!state.move_to(Pos::new(3.0, 4.0)));
        assert_eq!(state.position(), Pos::new(3.0, 4.0));
    }

    #[test]
    fn test_visibility_toggle() {
        let state = GeometryState::new();
        assert!(state.visible());
        state.hide();
        assert!(!state.visible());
        state.show();
        assert!(state.visible());
    }
}
