//! Stable widget identity.

use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a widget, independent of its content.
///
/// Ids are allocated from a process-wide counter and never reused, so two
/// widgets with identical state still have distinct ids. The renderer cache
/// and refresh scheduler key on this, never on structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(NonZeroU64);

impl WidgetId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        let raw = NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed);
        Self::from_raw(raw)
    }

    /// Rebuild an id from its raw value. Zero is mapped to one.
    pub fn from_raw(raw: u64) -> Self {
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// Get the raw u64 value.
    pub const fn as_u64(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Widget#{}", self.0)
    }
}

static_assertions::assert_eq_size!(WidgetId, Option<WidgetId>);
