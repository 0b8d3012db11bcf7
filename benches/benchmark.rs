//! Performance benchmarks for rs-cart-extraction.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Snapshot parsing and layout of a synthetic cart page
//! - Full extraction over carts of increasing size

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_cart_extraction::{extract, HtmlSnapshot, Options};
use tokio::runtime::{Builder, Runtime};

const PAGE: &str = "https://shop.example/cart";

fn cart_page(rows: usize) -> String {
    let items: String = (1..=rows)
        .map(|n| {
            format!(
                r#"<div class="cart-line" style="width:900px;height:120px">
                     <a href="/p/{n}"><img src="/img/{n}.jpg" width=80 height=80></a>
                     <div class="details"><a href="/p/{n}">Product number {n}</a><span>In stock</span></div>
                     <span class="price">${n}.99</span>
                     <label>Qty</label><input value="1">
                     <button>Remove</button>
                   </div>"#
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Your Cart</title></head>
<body>
    <header style="width:1280px;height:60px"><a href="/">Home</a><a href="/cart">Cart</a></header>
    <main><h1>Shopping cart</h1><div class="items">{items}</div></main>
    <footer><p>Copyright 2024</p></footer>
</body>
</html>"#
    )
}

fn runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("benchmark runtime")
}

fn bench_parse(c: &mut Criterion) {
    let html = cart_page(20);
    c.bench_function("parse_snapshot", |b| {
        b.iter(|| HtmlSnapshot::parse(black_box(&html), PAGE));
    });
}

/// Extraction at full duty cycle so the numbers measure work, not sleeps.
fn bench_extract(c: &mut Criterion) {
    let rt = runtime();
    let options = Options {
        duty_cycle: 1.0,
        timeout: std::time::Duration::from_secs(60),
        ..Options::default()
    };

    let mut group = c.benchmark_group("extract");
    for rows in [1, 10, 50] {
        let html = cart_page(rows);
        let snapshot = HtmlSnapshot::parse(&html, PAGE).expect("valid page URL");
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &snapshot, |b, snapshot| {
            b.iter(|| rt.block_on(extract(black_box(snapshot), black_box(&options))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_extract);
criterion_main!(benches);
