//! Composition traversal tests.

use std::rc::Rc;

use trellis_test_utils::{RecordingWidget, RendererCall};
use trellis_ui::paint::paint;
use trellis_ui::widgets::{Button, Panel, Toggle};
use trellis_ui::{
    Canvas, CanvasConfig, CanvasObject, Color, DrawCommand, Geometry, Pos, Rectangle,
    RendererCache, Size, Vec2, Widget, WidgetRef,
};

fn widget(widget: &Rc<RecordingWidget>) -> CanvasObject {
    CanvasObject::widget(widget.clone())
}

fn fills(commands: &[DrawCommand]) -> Vec<Color> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Quad(quad) => Some(quad.fill),
            _ => None,
        })
        .collect()
}

#[test]
fn test_background_paints_beneath_children() {
    let parent = RecordingWidget::new();
    parent.set_background(Color::RED);
    parent.resize(Size::new(50.0, 50.0));
    let child = Rectangle::new(Color::BLUE);
    parent.push_child(child);

    let mut cache = RendererCache::new();
    let (list, stats) = paint(&mut cache, &[widget(&parent)]);

    assert_eq!(fills(list.commands()), vec![Color::RED, Color::BLUE]);
    assert_eq!(list.commands()[0].owner(), Some(parent.id()));
    assert_eq!(list.commands()[1].owner(), Some(parent.id()));
    assert_eq!(stats.widgets, 1);
    assert_eq!(stats.primitives, 1);
}

#[test]
fn test_transparent_background_emits_nothing() {
    let parent = RecordingWidget::new();
    parent.set_background(Color::TRANSPARENT);

    let mut cache = RendererCache::new();
    let (list, _) = paint(&mut cache, &[widget(&parent)]);
    assert!(list.is_empty());
}

#[test]
fn test_layout_uses_widget_size() {
    let parent = RecordingWidget::new();
    parent.resize(Size::new(40.0, 30.0));

    let mut cache = RendererCache::new();
    paint(&mut cache, &[widget(&parent)]);

    assert!(
        parent
            .log()
            .calls_for(0)
            .contains(&RendererCall::Layout(Size::new(40.0, 30.0)))
    );
}

#[test]
fn test_sibling_order_is_preserved() {
    let inner = RecordingWidget::new();
    inner.set_background(Color::GREEN);
    inner.push_child(Rectangle::new(Color::BLACK));

    let outer = RecordingWidget::new();
    outer.set_background(Color::TRANSPARENT);
    outer.push_child(Rectangle::new(Color::RED));
    outer.push_child(Rectangle::new(Color::BLUE));
    outer.push_child(CanvasObject::widget(inner));
    outer.push_child(Rectangle::new(Color::WHITE));

    let mut cache = RendererCache::new();
    let (list, _) = paint(&mut cache, &[widget(&outer)]);

    assert_eq!(
        fills(list.commands()),
        vec![Color::RED, Color::BLUE, Color::GREEN, Color::BLACK, Color::WHITE]
    );
}

#[test]
fn test_positions_accumulate_down_the_tree() {
    let inner = RecordingWidget::new();
    inner.set_background(Color::GREEN);
    inner.move_to(Pos::new(10.0, 20.0));
    let leaf = Rectangle::new(Color::BLACK);
    leaf.move_to(Pos::new(1.0, 2.0));
    inner.push_child(leaf);

    let outer = RecordingWidget::new();
    outer.set_background(Color::TRANSPARENT);
    outer.move_to(Pos::new(100.0, 200.0));
    outer.push_child(CanvasObject::widget(inner.clone()));

    let mut cache = RendererCache::new();
    let (list, _) = paint(&mut cache, &[widget(&outer)]);

    let positions: Vec<Vec2> = list.iter().map(DrawCommand::position).collect();
    assert_eq!(
        positions,
        vec![Vec2::new(110.0, 220.0), Vec2::new(111.0, 222.0)]
    );
    assert_eq!(list.commands()[1].owner(), Some(inner.id()));
}

#[test]
fn test_hidden_widget_is_skipped_but_keeps_renderer() {
    let shown = RecordingWidget::new();
    let hidden = RecordingWidget::new();
    let roots = vec![widget(&hidden), widget(&shown)];

    let mut cache = RendererCache::new();
    paint(&mut cache, &roots);
    let before = cache.renderer(hidden.id()).unwrap();

    hidden.hide();
    let (list, stats) = paint(&mut cache, &roots);
    assert_eq!(stats.hidden, 1);
    assert!(list.commands_for(hidden.id()).next().is_none());
    assert!(list.commands_for(shown.id()).next().is_some());

    hidden.show();
    paint(&mut cache, &roots);
    assert!(before.ptr_eq(&cache.renderer(hidden.id()).unwrap()));
    assert_eq!(hidden.log().created(), 1);
    assert_eq!(hidden.log().destroys(0), 0);
}

#[test]
fn test_never_shown_widget_gets_no_renderer() {
    let hidden = RecordingWidget::new();
    hidden.hide();

    let mut cache = RendererCache::new();
    paint(&mut cache, &[widget(&hidden)]);
    assert_eq!(hidden.log().created(), 0);
    assert!(cache.is_empty());
}

#[test]
fn test_self_cycle_drops_only_that_subtree() {
    let before = Rectangle::new(Color::BLUE);
    let cyclic = RecordingWidget::new();
    cyclic.set_background(Color::RED);
    cyclic.push_child(cyclic.clone() as WidgetRef);
    let sibling = RecordingWidget::new();
    sibling.set_background(Color::GREEN);

    let mut cache = RendererCache::new();
    let (list, stats) = paint(
        &mut cache,
        &[CanvasObject::from(before), widget(&cyclic), widget(&sibling)],
    );

    assert_eq!(fills(list.commands()), vec![Color::BLUE, Color::GREEN]);
    assert_eq!(stats.errors, 1);
    let error = &list.errors()[0];
    assert_eq!(error.widget, cyclic.id());
    assert_eq!(error.repeated, cyclic.id());
    assert_eq!(error.path, vec![cyclic.id()]);

    cyclic.set_children(Vec::new());
}

#[test]
fn test_transitive_cycle_drops_repeated_subtree() {
    let a = RecordingWidget::new();
    a.set_background(Color::RED);
    let b = RecordingWidget::new();
    b.set_background(Color::BLUE);
    a.push_child(CanvasObject::widget(b.clone()));
    b.push_child(CanvasObject::widget(a.clone()));
    let sibling = RecordingWidget::new();
    sibling.set_background(Color::GREEN);

    let mut cache = RendererCache::new();
    let (list, _) = paint(&mut cache, &[widget(&a), widget(&sibling)]);

    assert_eq!(fills(list.commands()), vec![Color::GREEN]);
    assert_eq!(list.errors().len(), 1);
    let error = &list.errors()[0];
    assert_eq!(error.widget, b.id());
    assert_eq!(error.repeated, a.id());
    assert_eq!(error.path, vec![a.id(), b.id()]);

    b.set_children(Vec::new());
}

#[test]
fn test_cycle_inside_container_keeps_container() {
    let cyclic = RecordingWidget::new();
    cyclic.push_child(cyclic.clone() as WidgetRef);
    let healthy = Toggle::new("Still here");

    let panel = Panel::with_children(vec![
        CanvasObject::widget(cyclic.clone()),
        CanvasObject::widget(healthy.clone()),
    ]);

    let mut canvas = Canvas::default();
    canvas.add(CanvasObject::widget(panel.clone()));
    let frame = canvas.paint();

    assert_eq!(frame.stats.errors, 1);
    assert!(frame.draw_list.commands_for(panel.id()).next().is_some());
    assert!(frame.draw_list.commands_for(healthy.id()).next().is_some());
    assert!(frame.draw_list.commands_for(cyclic.id()).next().is_none());

    cyclic.set_children(Vec::new());
}

#[test]
fn test_repeated_paint_is_deterministic() {
    let toggle = Toggle::new("Notifications");
    let button = Button::with_icon("Send", ">");
    let panel = Panel::with_children(vec![
        CanvasObject::widget(toggle.clone()),
        CanvasObject::widget(button.clone()),
    ]);

    let mut canvas = Canvas::new(CanvasConfig::default().with_size(Size::new(400.0, 300.0)));
    canvas.add(CanvasObject::widget(panel.clone()));

    let first = canvas.paint();
    let second = canvas.paint();
    assert_eq!(first.draw_list, second.draw_list);
    assert_eq!(first.stats, second.stats);

    let widget: WidgetRef = toggle.clone();
    let renderer = canvas.renderer_for(&widget);
    assert_eq!(renderer.min_size(), renderer.min_size());
    let objects = renderer.objects();
    let again = renderer.objects();
    assert_eq!(objects.len(), again.len());
    assert!(objects.iter().zip(&again).all(|(a, b)| a.ptr_eq(b)));
}
