use criterion::{black_box, criterion_group, criterion_main, Criterion};
use infogen::background::{apply, select_background};
use infogen::color::BrandPalette;
use infogen::{extract_svg, ExtractOptions, ResourceResolver, VirtualDocument};
use serde_json::json;

// Run with:
//    cargo bench --bench compose_bench

fn sample_page(items: usize) -> String {
    let mut body = String::new();
    for i in 0..items {
        body.push_str(&format!(
            r##"<g transform="translate({x},40)"><rect width="120" height="80" fill="#194582"></rect><text x="8" y="24">Item {i}</text></g>"##,
            x = i * 130,
            i = i
        ));
    }
    format!(
        r#"<div id="container"><svg viewBox="0 0 {w} 400"><defs></defs>{body}</svg></div>"#,
        w = items * 130 + 40,
        body = body
    )
}

fn bench_backgrounds(c: &mut Criterion) {
    let doc = VirtualDocument::parse(&sample_page(8));
    let palette = BrandPalette::default();

    for name in ["spotlight", "subtle-dots", "spotlight-dots", "tech-matrix"] {
        let Some(option) = select_background(name, &palette) else { continue };
        c.bench_function(&format!("apply_background/{}", name), |b| {
            b.iter(|| {
                let mut svg = doc.svg_in("#container").expect("sample page has an svg");
                apply(&mut svg, black_box(&option));
                black_box(svg.to_markup())
            })
        });
    }
}

fn bench_extract(c: &mut Criterion) {
    let doc = VirtualDocument::parse(&sample_page(24));
    let options = ExtractOptions::default()
        .with_background(select_background("spotlight-grid", &BrandPalette::default()));

    c.bench_function("extract_svg/24_items_layered", |b| {
        b.iter(|| extract_svg(black_box(&doc), &options).expect("extract"))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let items: Vec<_> = (0..12)
        .map(|i| {
            let icon = if i % 2 == 0 { "icon:rocket" } else { "icon:users" };
            json!({"label": format!("Step {}", i), "icon": icon, "illus": format!("illus:step-{}", i)})
        })
        .collect();
    let data = json!({"title": "Roadmap", "items": items});

    c.bench_function("resolve_data/12_items_cold", |b| {
        b.iter(|| ResourceResolver::default().resolve_data(black_box(&data)))
    });
}

criterion_group!(benches, bench_backgrounds, bench_extract, bench_resolve);
criterion_main!(benches);
