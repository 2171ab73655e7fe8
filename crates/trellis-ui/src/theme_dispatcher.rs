//! Broadcast of theme changes to every live renderer.
//!
//! There is exactly one dispatcher per rendering loop. It lives in a
//! thread-local slot on the loop thread, is created with
//! [`ThemeDispatcher::init`] at startup and removed with
//! [`ThemeDispatcher::shutdown`]. Renderers are only reachable from that
//! thread, so a thread-local is the process-wide registry for them.
//!
//! The dispatcher only holds [`WeakRendererHandle`]s: a renderer that was
//! destroyed or dropped by the cache simply stops receiving themes.
//!
//! ```
//! use trellis_ui::{Theme, ThemeDispatcher};
//!
//! ThemeDispatcher::init(Theme::light()).unwrap();
//! assert_eq!(ThemeDispatcher::current().unwrap().name, "light");
//!
//! ThemeDispatcher::broadcast(Theme::dark()).unwrap();
//! assert_eq!(ThemeDispatcher::current().unwrap().name, "dark");
//!
//! ThemeDispatcher::shutdown();
//! assert!(!ThemeDispatcher::is_initialized());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::profiling::profile_function;

use crate::error::{UiError, UiResult};
use crate::renderer::{RendererHandle, WeakRendererHandle};
use crate::theme::Theme;

// Registrations between prunes are bounded by this floor or the live count.
const PRUNE_FLOOR: usize = 64;

thread_local! {
    static DISPATCHER: RefCell<Option<ThemeDispatcher>> = const { RefCell::new(None) };
}

/// Registry of renderers that receive theme changes.
#[derive(Debug)]
pub struct ThemeDispatcher {
    current: Rc<Theme>,
    renderers: Vec<WeakRendererHandle>,
    // Registry length that triggers the next prune in `register`.
    prune_at: usize,
    generation: u64,
}

impl ThemeDispatcher {
    /// Install the dispatcher for this rendering loop.
    ///
    /// Fails if one is already installed; call [`ThemeDispatcher::shutdown`]
    /// first to start over.
    pub fn init(theme: Theme) -> UiResult<()> {
        DISPATCHER.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_some() {
                return Err(UiError::DispatcherAlreadyInitialized);
            }
            tracing::debug!("Theme dispatcher initialized with theme '{}'", theme.name);
            *slot = Some(ThemeDispatcher {
                current: Rc::new(theme),
                renderers: Vec::new(),
                prune_at: PRUNE_FLOOR,
                generation: 0,
            });
            Ok(())
        })
    }

    /// Remove the dispatcher. Returns `false` if none was installed.
    ///
    /// Renderers are not touched; they belong to the cache.
    pub fn shutdown() -> bool {
        DISPATCHER.with(|slot| {
            let removed = slot.borrow_mut().take();
            if let Some(dispatcher) = &removed {
                tracing::debug!(
                    "Theme dispatcher shut down after {} broadcasts",
                    dispatcher.generation
                );
            }
            removed.is_some()
        })
    }

    pub fn is_initialized() -> bool {
        DISPATCHER.with(|slot| slot.borrow().is_some())
    }

    /// The theme most recently installed or broadcast.
    pub fn current() -> UiResult<Rc<Theme>> {
        Self::with(|dispatcher| dispatcher.current.clone())
    }

    /// Like [`ThemeDispatcher::current`], falling back to the default theme
    /// when no dispatcher is installed.
    pub fn current_or_default() -> Rc<Theme> {
        Self::current().unwrap_or_else(|_| Rc::new(Theme::default()))
    }

    /// Number of completed broadcasts.
    pub fn generation() -> UiResult<u64> {
        Self::with(|dispatcher| dispatcher.generation)
    }

    /// Start delivering theme changes to `renderer`.
    ///
    /// Returns `false` when no dispatcher is installed.
    pub fn register(renderer: &RendererHandle) -> bool {
        Self::with(|dispatcher| {
            if dispatcher.renderers.len() >= dispatcher.prune_at {
                dispatcher.prune();
            }
            dispatcher.renderers.push(renderer.downgrade());
        })
        .is_ok()
    }

    /// Number of registry entries, including renderers that died since the
    /// last prune.
    pub fn registered() -> UiResult<usize> {
        Self::with(|dispatcher| dispatcher.renderers.len())
    }

    /// Number of registered renderers that are still live.
    pub fn live_renderers() -> UiResult<usize> {
        Self::with(|dispatcher| {
            dispatcher.prune();
            dispatcher.renderers.len()
        })
    }

    /// Make `theme` current and apply it to every live renderer.
    ///
    /// All `apply_theme` calls have returned when this returns, so the next
    /// paint pass sees the new theme everywhere. Order across renderers is
    /// unspecified. Returns the number of renderers updated.
    pub fn broadcast(theme: Theme) -> UiResult<usize> {
        profile_function!();

        let (theme, targets) = Self::with(|dispatcher| {
            dispatcher.current = Rc::new(theme);
            dispatcher.generation += 1;
            dispatcher.prune();
            let targets: Vec<RendererHandle> = dispatcher
                .renderers
                .iter()
                .filter_map(WeakRendererHandle::upgrade)
                .collect();
            (dispatcher.current.clone(), targets)
        })?;

        // The slot is released here so renderers may read the current theme.
        for renderer in &targets {
            renderer.apply_theme(&theme);
        }

        tracing::debug!(
            "Broadcast theme '{}' to {} renderers",
            theme.name,
            targets.len()
        );
        Ok(targets.len())
    }

    fn with<R>(f: impl FnOnce(&mut ThemeDispatcher) -> R) -> UiResult<R> {
        DISPATCHER.with(|slot| {
            let mut slot = slot.borrow_mut();
            let dispatcher = slot.as_mut().ok_or(UiError::DispatcherNotInitialized)?;
            Ok(f(dispatcher))
        })
    }

    fn prune(&mut self) {
        self.renderers.retain(|weak| weak.upgrade().is_some());
        self.prune_at = (self.renderers.len() * 2).max(PRUNE_FLOOR);
    }
}
