//! Reference widgets built on the public capability traits.
//!
//! They use nothing a third-party widget could not: each holds a
//! [`GeometryState`](crate::geometry::GeometryState), reports state changes
//! through a [`RefreshSlot`](crate::refresh::RefreshSlot), and builds a
//! private renderer that keeps a `Weak` back-reference to it.
//!
//! - [`Toggle`] - checkbox with a label
//! - [`Button`] - push button with an optional icon
//! - [`Panel`] - vertical stack of child objects

pub mod button;
pub mod panel;
pub mod toggle;

pub use button::Button;
pub use panel::Panel;
pub use toggle::Toggle;
