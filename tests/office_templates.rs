use stencil::builder::ContactBuilder;
use stencil::entity::Contact;
use stencil::registry::{Prototype, Registry};
use stencil::settings::{FileFormat, Settings, TemplateSource};
use stencil::StencilError;

const OFFICES: &str = r#"
[templates.main_office]
address = { street = "123 East Drive", city = "London", suite = 0 }

[templates.aux_office]
address = { street = "123B East Drive", city = "London", suite = 0 }
"#;

fn setup() -> (Registry<String, Contact>, TemplateSource) {
    let settings = Settings::from_text(OFFICES, FileFormat::Toml).unwrap();
    stencil::init_tracing(&settings);
    (Registry::from_settings(&settings), TemplateSource::from_settings(&settings))
}

fn employee(registry: &Registry<String, Contact>, source: &TemplateSource, name: &str, suite: u32) -> Contact {
    let office = registry
        .get_or_try_create("main_office".to_string(), source.factory("main_office"))
        .unwrap();
    let mut builder = ContactBuilder::start(office.instantiate());
    builder.named(name).unwrap();
    builder.lives().unwrap().suite(suite).finalize().unwrap()
}

#[test]
fn two_employees_from_one_office() {
    let (registry, source) = setup();
    let john = employee(&registry, &source, "John", 123);
    let jane = employee(&registry, &source, "Jane", 103);
    assert_eq!(john.address.city, "London");
    assert_eq!(jane.address.city, "London");
    assert_eq!(john.address.suite, 123);
    assert_eq!(jane.address.suite, 103);
    let office = registry.get(&"main_office".to_string()).unwrap().unwrap();
    assert_eq!(office.address.suite, 0);
    assert_eq!(office.address.street, "123 East Drive");
}

#[test]
fn unknown_template_is_not_cached() {
    let (registry, source) = setup();
    let err = registry
        .get_or_try_create("head_office".to_string(), source.factory("head_office"))
        .unwrap_err();
    assert!(matches!(err, StencilError::Registry { .. }));
    assert!(!registry.contains(&"head_office".to_string()).unwrap());
}

#[test]
fn each_office_is_its_own_prototype() {
    let (registry, source) = setup();
    let main = registry.get_or_try_create("main_office".to_string(), source.factory("main_office")).unwrap();
    let aux = registry.get_or_try_create("aux_office".to_string(), source.factory("aux_office")).unwrap();
    assert!(!Prototype::ptr_eq(&main, &aux));
    assert_eq!(aux.address.street, "123B East Drive");
}
