//! Widget and renderer capabilities.
//!
//! - [`Widget`] - stateful node that can build a [`Renderer`]
//! - [`Renderer`] - per-widget drawing delegate
//! - [`WidgetId`] - stable identity used as the cache key

pub mod capability;
pub mod id;

pub use capability::*;
pub use id::WidgetId;
