// benches/benchmarks.rs — Performance benchmarks (criterion)
//
// Hot paths of a large run:
//   1. Verdict extraction from chatty model output
//   2. CSV projection of a full checkpoint (rewritten after every batch)
//   3. Catalog search over a few thousand products

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chatqa::core::checkpoint::ReportSet;
use chatqa::core::projector::project;
use chatqa::core::types::{QualityReport, RawReport};
use chatqa::evaluator::parser::extract_report;
use chatqa::lookup::catalog::{Catalog, Product};

fn bench_extract_report(c: &mut Criterion) {
    let text = format!(
        "<think>{}</think>\nHere is the evaluation:\n{}\nLet me know if you need more.",
        "reasoning ".repeat(200),
        r#"{"user_satisfaction":"medium","bot_accuracy":"high","issue_resolved":true,"chat_complete":true,"issues":["late reply"],"quality_score":72,"summary":"Handled, with a delay"}"#
    );
    c.bench_function("extract_report", |b| {
        b.iter(|| extract_report(black_box(&text)))
    });
}

fn bench_project(c: &mut Criterion) {
    let reports: ReportSet = (0..5_000)
        .map(|i| {
            QualityReport::from_raw(
                format!("session-{i}"),
                RawReport {
                    user_satisfaction: Some("high".into()),
                    quality_score: Some((i % 100) as f64),
                    summary: Some(format!("Summary {i} with \"quotes\"\nand a newline")),
                    ..Default::default()
                },
                "qwen3:8b",
                "2026-01-01T00:00:00.000Z",
            )
        })
        .collect();
    c.bench_function("project_5k", |b| b.iter(|| project(black_box(&reports))));
}

fn bench_catalog_search(c: &mut Criterion) {
    let words = ["koala", "mat", "sofa", "bed", "pillow", "lamp", "oak", "table"];
    let products: Vec<Product> = (0..3_000)
        .map(|i| {
            let name = format!(
                "{} {} {}",
                words[i % words.len()],
                words[(i / 8) % words.len()],
                i
            );
            Product {
                legacy_id: serde_json::json!(i),
                slug: name.replace(' ', "-"),
                name,
                default_image: None,
            }
        })
        .collect();
    let catalog = Catalog::new(products);

    let mut group = c.benchmark_group("catalog_search");
    group.bench_function("token", |b| {
        b.iter(|| catalog.search(black_box("koala mat"), 8))
    });
    group.bench_function("fuzzy", |b| {
        b.iter(|| catalog.search(black_box("pilow lmp"), 8))
    });
    group.finish();
}

criterion_group!(benches, bench_extract_report, bench_project, bench_catalog_search);
criterion_main!(benches);
