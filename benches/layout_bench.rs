use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rfplacard::rendering::compositor::compose;
use rfplacard::rendering::layout::{layout_units, FixedAdvance};
use rfplacard::rendering::markup::tokenize;
use rfplacard::{CanvasSize, Language, RenderConfig, Rgba};

const GOLD: Rgba = Rgba::rgb(0xd8, 0xae, 0x5c);

fn bench_tokenize_layout(c: &mut Criterion) {
    let text = Language::Japanese.sample_text().repeat(8);

    c.bench_function("tokenize", |b| {
        b.iter(|| tokenize(black_box(&text), Rgba::WHITE, GOLD))
    });

    let units = tokenize(&text, Rgba::WHITE, GOLD);
    c.bench_function("layout_units", |b| {
        b.iter(|| layout_units(black_box(&units), |_| 80.0, 864.0))
    });
}

fn bench_compose(c: &mut Criterion) {
    let cfg = RenderConfig {
        text: Language::English.sample_text().to_string(),
        footer_text: "Spokesperson 2025".into(),
        ..Default::default()
    };
    let mut measure = FixedAdvance { ratio: 0.6 };

    c.bench_function("compose", |b| {
        b.iter(|| compose(black_box(&cfg), None, CanvasSize::default(), &mut measure))
    });
}

criterion_group!(benches, bench_tokenize_layout, bench_compose);
criterion_main!(benches);
