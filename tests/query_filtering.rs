use std::thread;

use stencil::entity::{Address, Color, Contact, Product, Size};
use stencil::predicates::{CitySpec, ColorSpec, CompanySpec, SizeSpec};
use stencil::query::{filter, QueryEngine};
use stencil::specification::{And, Specification, SpecificationExt};

fn catalogue() -> Vec<Product> {
    vec![
        Product::new("Apple", Color::Green, Size::Small, 1),
        Product::new("Tree", Color::Green, Size::Large, 100),
        Product::new("House", Color::Blue, Size::Large, 1000),
    ]
}

#[test]
fn green_and_large_finds_only_the_tree() {
    let products = catalogue();
    let spec = And::new(vec![Box::new(ColorSpec(Color::Green)), Box::new(SizeSpec(Size::Large))]);
    let matched = QueryEngine::new().filter(&products, &spec);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Tree");
}

#[test]
fn filter_matches_a_plain_comprehension() {
    let products = catalogue();
    let spec = ColorSpec(Color::Green).or(SizeSpec(Size::Large).and(ColorSpec(Color::Blue)).not());
    let matched = filter(&products, &spec);
    let expected: Vec<&Product> = products.iter().filter(|p| spec.is_satisfied(p)).collect();
    assert_eq!(matched, expected);
    let names: Vec<&str> = matched.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Apple", "Tree"]);
}

#[test]
fn one_spec_serves_many_threads() {
    let mut people = Vec::new();
    for (i, city) in ["London", "Paris", "London", "Leeds"].into_iter().enumerate() {
        let mut contact = Contact::with_address(&format!("c{i}"), Address::new("1 Road", city, i as u32));
        contact.employment.company = if i % 2 == 0 { "Fabrikam" } else { "Contoso" }.to_string();
        people.push(contact);
    }
    let spec = CitySpec::new("London").and(CompanySpec::new("Fabrikam"));
    let counts: Vec<usize> = thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| QueryEngine::new().count(&people, &spec)))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![2; 4]);
}

#[test]
fn selections_intersect_by_position() {
    let products = catalogue();
    let engine = QueryEngine::new();
    let green = engine.select(&products, &ColorSpec(Color::Green));
    let large = engine.select(&products, &SizeSpec(Size::Large));
    assert_eq!((&green & &large).iter().collect::<Vec<u32>>(), vec![1]);
    assert_eq!((&green | &large).len(), 3);
}
