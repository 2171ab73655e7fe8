//! Benchmarks for the paint loop.
//!
//! Measures:
//! - Steady-state frames (every renderer cached)
//! - Frames after a burst of coalesced refreshes
//! - Cold frames (every renderer invalidated)
//! - Theme broadcast over a populated cache

use std::rc::Rc;
use std::sync::Once;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use trellis_core::config::{Config, ProfilingMode};
use trellis_ui::widgets::{Button, Panel, Toggle};
use trellis_ui::{Canvas, CanvasConfig, CanvasObject, Size, Theme, ThemeDispatcher};

static SETUP: Once = Once::new();

fn build_canvas(rows: usize) -> (Canvas, Vec<Rc<Toggle>>) {
    SETUP.call_once(|| {
        Config::default()
            .with_log_filter("warn")
            .with_profiling(ProfilingMode::Off)
            .apply();
    });

    let mut toggles = Vec::with_capacity(rows);
    let panel = Panel::new();
    for i in 0..rows {
        let toggle = Toggle::new(format!("Option {}", i));
        panel.push(CanvasObject::widget(toggle.clone()));
        panel.push(CanvasObject::widget(Button::new(format!("Apply {}", i))));
        toggles.push(toggle);
    }

    let mut canvas = Canvas::new(CanvasConfig::default().with_size(Size::new(800.0, 600.0)));
    canvas.add(CanvasObject::widget(panel));
    canvas.paint();
    (canvas, toggles)
}

fn bench_steady_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint/steady");

    for rows in [10, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let (mut canvas, _toggles) = build_canvas(rows);
            b.iter(|| black_box(canvas.paint()));
        });
    }

    group.finish();
}

fn bench_refresh_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint/refresh_burst");

    for rows in [10, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let (mut canvas, toggles) = build_canvas(rows);
            b.iter(|| {
                for toggle in &toggles {
                    toggle.toggle();
                    toggle.toggle();
                    toggle.toggle();
                }
                black_box(canvas.paint())
            });
        });
    }

    group.finish();
}

fn bench_cold_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint/cold");

    for rows in [10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let (mut canvas, _toggles) = build_canvas(rows);
            b.iter(|| {
                canvas.cache_mut().clear();
                black_box(canvas.paint())
            });
        });
    }

    group.finish();
}

fn bench_theme_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("theme/broadcast");
    let _ = ThemeDispatcher::init(Theme::light());

    for rows in [10, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let (_canvas, _toggles) = build_canvas(rows);
            let mut dark = false;
            b.iter(|| {
                dark = !dark;
                let theme = if dark { Theme::dark() } else { Theme::light() };
                black_box(ThemeDispatcher::broadcast(theme).unwrap_or_default())
            });
        });
    }

    ThemeDispatcher::shutdown();
    group.finish();
}

criterion_group!(
    benches,
    bench_steady_frame,
    bench_refresh_burst,
    bench_cold_frame,
    bench_theme_broadcast
);
criterion_main!(benches);
