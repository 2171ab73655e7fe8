//! Renderer cache lifecycle tests.

use std::rc::Rc;

use trellis_test_utils::{RecordingWidget, RendererCall};
use trellis_ui::{CanvasObject, Geometry, RendererCache, Size, Widget, WidgetRef};

fn widget_ref(widget: &Rc<RecordingWidget>) -> WidgetRef {
    widget.clone()
}

#[test]
fn test_get_twice_returns_same_instance() {
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::new();

    let first = cache.get(&widget_ref(&widget));
    let second = cache.get(&widget_ref(&widget));

    assert!(first.ptr_eq(&second));
    assert_eq!(widget.log().created(), 1);
    assert_eq!(cache.created_count(), 1);
}

#[test]
fn test_invalidate_destroys_once_and_recreates() {
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::new();

    let old = cache.get(&widget_ref(&widget));
    assert!(cache.invalidate(widget.id()));
    assert!(old.is_destroyed());
    assert_eq!(widget.log().destroys(0), 1);

    let new = cache.get(&widget_ref(&widget));
    assert!(!new.ptr_eq(&old));
    assert_ne!(new.id(), old.id());
    assert_eq!(widget.log().created(), 2);
    assert_eq!(widget.log().destroys(0), 1);
}

#[test]
fn test_invalidate_unknown_widget() {
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::new();
    assert!(!cache.invalidate(widget.id()));
    assert_eq!(widget.log().created(), 0);
}

#[test]
fn test_n_cycles_create_n_instances() {
    const CYCLES: usize = 8;
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::new();
    let mut seen = Vec::new();

    for _ in 0..CYCLES {
        let renderer = cache.get(&widget_ref(&widget));
        assert!(seen.iter().all(|id| *id != renderer.id()));
        seen.push(renderer.id());
        cache.invalidate(widget.id());
    }

    assert_eq!(seen.len(), CYCLES);
    assert_eq!(widget.log().created(), CYCLES);
    for instance in 0..CYCLES {
        assert_eq!(widget.log().destroys(instance), 1);
    }
}

#[test]
fn test_destroyed_outside_cache_is_replaced() {
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::new();

    let first = cache.get(&widget_ref(&widget));
    first.destroy();
    assert!(cache.renderer(widget.id()).is_none());

    let second = cache.get(&widget_ref(&widget));
    assert!(!second.is_destroyed());
    assert_eq!(widget.log().created(), 2);
    assert_eq!(widget.log().destroys(0), 1);
}

#[test]
fn test_destroy_failure_is_swallowed() {
    let widget = RecordingWidget::new();
    widget.set_fail_destroy(true);
    let mut cache = RendererCache::new();

    let renderer = cache.get(&widget_ref(&widget));
    assert!(cache.invalidate(widget.id()));
    assert!(renderer.is_destroyed());
    assert!(!cache.contains(widget.id()));
}

#[test]
fn test_sweep_tears_down_dropped_widgets() {
    let kept = RecordingWidget::new();
    let dropped = RecordingWidget::new();
    let dropped_log = dropped.log().clone();
    let mut cache = RendererCache::new();

    cache.get(&widget_ref(&kept));
    let orphan = cache.get(&widget_ref(&dropped));
    drop(dropped);

    assert_eq!(cache.sweep(), 1);
    assert!(orphan.is_destroyed());
    assert_eq!(dropped_log.destroys(0), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(kept.id()));
}

#[test]
fn test_hide_keeps_renderer() {
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::new();

    let renderer = cache.get(&widget_ref(&widget));
    widget.hide();
    cache.sweep();
    widget.show();

    assert!(renderer.ptr_eq(&cache.get(&widget_ref(&widget))));
    assert_eq!(widget.log().destroys(0), 0);
}

#[test]
fn test_idle_expiry() {
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::with_idle_expiry(2);

    let renderer = cache.get(&widget_ref(&widget));
    assert_eq!(cache.sweep(), 0);
    assert_eq!(cache.sweep(), 0);
    assert_eq!(cache.sweep(), 0);
    assert_eq!(cache.sweep(), 1);
    assert!(renderer.is_destroyed());
    assert!(cache.is_empty());
}

#[test]
fn test_use_resets_idle_window() {
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::with_idle_expiry(1);

    let renderer = cache.get(&widget_ref(&widget));
    for _ in 0..5 {
        cache.sweep();
        cache.get(&widget_ref(&widget));
    }
    assert!(!renderer.is_destroyed());
}

#[test]
fn test_clear_and_drop_destroy_everything() {
    let a = RecordingWidget::new();
    let b = RecordingWidget::new();

    let mut cache = RendererCache::new();
    let ra = cache.get(&widget_ref(&a));
    cache.clear();
    assert!(ra.is_destroyed());
    assert!(cache.is_empty());

    let rb = cache.get(&widget_ref(&b));
    drop(cache);
    assert!(rb.is_destroyed());
    assert_eq!(b.log().destroys(0), 1);
}

#[test]
fn test_new_renderer_receives_current_state() {
    let child = RecordingWidget::new();
    let widget = RecordingWidget::with_children(vec![CanvasObject::widget(child)]);
    widget.set_min_size(Size::new(-5.0, 12.0));
    let mut cache = RendererCache::new();

    let renderer = cache.get(&widget_ref(&widget));
    assert_eq!(renderer.objects().len(), 1);
    assert_eq!(renderer.min_size(), Size::new(0.0, 12.0));
    assert_eq!(
        widget.log().calls_for(0).first(),
        Some(&RendererCall::Create)
    );
}

#[test]
fn test_renderer_lookup_does_not_create() {
    let widget = RecordingWidget::new();
    let mut cache = RendererCache::new();
    assert!(cache.renderer(widget.id()).is_none());
    assert_eq!(widget.log().created(), 0);

    cache.get(&widget_ref(&widget));
    assert!(cache.renderer(widget.id()).is_some());
    assert!(cache.widget(widget.id()).is_some());
}
