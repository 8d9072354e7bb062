//! Atomic predicates over the entity model. The combinators stay generic;
//! field knowledge lives here.

use regex::Regex;

use crate::entity::{Color, Contact, Product, Size};
use crate::error::{Result, StencilError};
use crate::specification::{Specification, SpecificationExt};

// ------------- Product -------------
#[derive(Clone, Copy, Debug)]
pub struct ColorSpec(pub Color);

impl Specification<Product> for ColorSpec {
    fn is_satisfied(&self, item: &Product) -> bool {
        item.color == self.0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SizeSpec(pub Size);

impl Specification<Product> for SizeSpec {
    fn is_satisfied(&self, item: &Product) -> bool {
        item.size == self.0
    }
}

/// Products priced at or below the limit.
#[derive(Clone, Copy, Debug)]
pub struct PriceSpec {
    pub max: u32,
}

impl Specification<Product> for PriceSpec {
    fn is_satisfied(&self, item: &Product) -> bool {
        item.price <= self.max
    }
}

// ------------- Contact -------------
#[derive(Clone, Debug)]
pub struct CitySpec(pub String);

impl CitySpec {
    pub fn new(city: &str) -> Self {
        Self(city.to_owned())
    }
}

impl Specification<Contact> for CitySpec {
    fn is_satisfied(&self, item: &Contact) -> bool {
        item.address.city == self.0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SuiteSpec(pub u32);

impl Specification<Contact> for SuiteSpec {
    fn is_satisfied(&self, item: &Contact) -> bool {
        item.address.suite == self.0
    }
}

#[derive(Clone, Debug)]
pub struct CompanySpec(pub String);

impl CompanySpec {
    pub fn new(company: &str) -> Self {
        Self(company.to_owned())
    }
}

impl Specification<Contact> for CompanySpec {
    fn is_satisfied(&self, item: &Contact) -> bool {
        item.employment.company == self.0
    }
}

/// Contacts whose name matches a regular expression.
#[derive(Clone, Debug)]
pub struct NamePattern(Regex);

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|e| StencilError::InvalidArgument(format!("bad name pattern: {e}")))
    }
}

impl Specification<Contact> for NamePattern {
    fn is_satisfied(&self, item: &Contact) -> bool {
        self.0.is_match(&item.name)
    }
}

impl SpecificationExt<Product> for ColorSpec {}
impl SpecificationExt<Product> for SizeSpec {}
impl SpecificationExt<Product> for PriceSpec {}
impl SpecificationExt<Contact> for CitySpec {}
impl SpecificationExt<Contact> for SuiteSpec {}
impl SpecificationExt<Contact> for CompanySpec {}
impl SpecificationExt<Contact> for NamePattern {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Address;

    #[test]
    fn price_is_inclusive() {
        let spec = PriceSpec { max: 10 };
        assert!(spec.is_satisfied(&Product::new("Apple", Color::Green, Size::Small, 10)));
        assert!(!spec.is_satisfied(&Product::new("Melon", Color::Green, Size::Large, 11)));
    }

    #[test]
    fn name_pattern() {
        let spec = NamePattern::new("^J(ohn|ane)$").unwrap();
        assert!(spec.is_satisfied(&Contact::new("Jane")));
        assert!(!spec.is_satisfied(&Contact::new("Janet")));
        assert!(NamePattern::new("(").is_err());
    }

    #[test]
    fn city_and_suite() {
        let contact = Contact::with_address("John", Address::new("123 East Drive", "London", 123));
        assert!(CitySpec::new("London").and(SuiteSpec(123)).is_satisfied(&contact));
        assert!(!CitySpec::new("London").and(SuiteSpec(103)).is_satisfied(&contact));
    }
}
