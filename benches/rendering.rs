//! Benchmarks for drawing a page and exporting HTML.

use std::path::PathBuf;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use docdeck::app::Model;
use docdeck::site::parse_configuration;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

const MANIFEST: &str = include_str!("../tests/fixtures/pages.toml");

fn bench_draw_page(c: &mut Criterion) {
    let mut model = Model::new(PathBuf::from("pages.toml"), (100, 40));
    model.apply_load_outcome(parse_configuration(MANIFEST));
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();

    c.bench_function("draw_page", |b| {
        b.iter(|| {
            terminal
                .draw(|frame| docdeck::ui::render(black_box(&model), frame))
                .unwrap();
        })
    });
}

fn bench_render_html(c: &mut Criterion) {
    let config = parse_configuration(MANIFEST).unwrap();
    c.bench_function("render_html", |b| {
        b.iter(|| {
            for page in &config.pages {
                black_box(docdeck::html::render_markdown(&page.content));
            }
        })
    });
}

criterion_group!(benches, bench_draw_page, bench_render_html);
criterion_main!(benches);
