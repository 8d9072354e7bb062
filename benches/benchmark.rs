use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use stencil::entity::{Address, Color, Contact, Product, Size};
use stencil::predicates::{ColorSpec, PriceSpec, SizeSpec};
use stencil::query::QueryEngine;
use stencil::registry::Registry;
use stencil::specification::SpecificationExt;

fn office() -> Contact {
    let mut contact = Contact::with_address("", Address::new("123 East Drive", "London", 0));
    contact.employment.office = Some(Box::new(Address::new("1 Works Road", "Leeds", 4)));
    contact
}

fn catalogue(n: u32) -> Vec<Product> {
    let colors = [Color::Red, Color::Green, Color::Blue];
    let sizes = [Size::Small, Size::Medium, Size::Large];
    (0..n)
        .map(|i| Product::new("item", colors[(i % 3) as usize], sizes[(i % 7 % 3) as usize], i % 500))
        .collect()
}

fn registry_hit(c: &mut Criterion) {
    let registry = Registry::<&str, Contact>::new();
    registry.get_or_create("main_office", office).unwrap();
    c.bench_function("registry hit", |b| {
        b.iter(|| registry.get_or_create(black_box("main_office"), office).unwrap())
    });
}

fn instantiate(c: &mut Criterion) {
    let registry = Registry::<&str, Contact>::new();
    let prototype = registry.get_or_create("main_office", office).unwrap();
    c.bench_function("instantiate prototype", |b| b.iter(|| black_box(prototype.instantiate())));
}

fn filter(c: &mut Criterion) {
    let products = catalogue(100_000);
    let spec = ColorSpec(Color::Green)
        .and(SizeSpec(Size::Large))
        .and(PriceSpec { max: 250 });
    let engine = QueryEngine::new();
    c.bench_function("filter 100k products", |b| {
        b.iter(|| black_box(engine.filter(&products, &spec)).len())
    });
    c.bench_function("select 100k products", |b| {
        b.iter(|| black_box(engine.select(&products, &spec)).len())
    });
}

criterion_group!(benches, registry_hit, instantiate, filter);
criterion_main!(benches);
