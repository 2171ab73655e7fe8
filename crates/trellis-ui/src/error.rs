use crate::widget::WidgetId;

/// Errors surfaced by the renderer lifecycle machinery.
///
/// Contract violations by widget or renderer code (using a renderer after
/// `destroy`, destroying twice) are not represented here: they panic, since
/// continuing would corrupt shared render state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UiError {
    #[error("theme dispatcher is already initialized on this thread")]
    DispatcherAlreadyInitialized,

    #[error("theme dispatcher is not initialized on this thread")]
    DispatcherNotInitialized,

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// Raised by the paint traversal when a renderer's objects lead back to a
/// widget that is already being expanded.
///
/// Only the subtree rooted at [`StructuralError::widget`] is dropped from the
/// frame; siblings still paint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("structural cycle: {widget} lists {repeated} which is already on the paint path {path:?}")]
pub struct StructuralError {
    /// Widget whose renderer produced the offending object list.
    pub widget: WidgetId,
    /// The widget that appeared twice.
    pub repeated: WidgetId,
    /// Widgets from the paint root down to `widget`.
    pub path: Vec<WidgetId>,
}

/// Failure to release a resource during [`Renderer::destroy`](crate::Renderer::destroy).
///
/// Teardown always completes; the handle only logs these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to release {resource}: {reason}")]
pub struct DestroyError {
    pub resource: String,
    pub reason: String,
}

impl DestroyError {
    pub fn new(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
