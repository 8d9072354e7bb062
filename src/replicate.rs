//! Deep copies of entity graphs.
//!
//! Owned sub-records are copied by value, deepest first, before the scalar
//! fields of the root. Shared references (`Arc<Region>`) are copied as new
//! pointers to the same target, never duplicated.

use std::sync::Arc;

use tracing::trace;

use crate::entity::{Address, Contact, Employment, Product, Region};

pub trait Replicate {
    /// A copy that owns none of `self`'s sub-records.
    fn replicate(&self) -> Self;
}

/// Replicates `source`. Total and free of side effects.
pub fn replicate<E: Replicate>(source: &E) -> E {
    source.replicate()
}

impl Replicate for Address {
    fn replicate(&self) -> Self {
        self.clone()
    }
}

impl Replicate for Employment {
    fn replicate(&self) -> Self {
        let office = self
            .office
            .as_ref()
            .map(|office| Box::new(office.replicate()));
        Self {
            office,
            company: self.company.clone(),
            position: self.position.clone(),
            annual_income: self.annual_income,
            since: self.since,
        }
    }
}

impl Replicate for Contact {
    fn replicate(&self) -> Self {
        trace!(name = %self.name, "replicating contact");
        let address = self.address.replicate();
        let employment = self.employment.replicate();
        Self {
            address,
            employment,
            name: self.name.clone(),
            region: self.region.as_ref().map(Arc::clone),
        }
    }
}

impl Replicate for Product {
    fn replicate(&self) -> Self {
        Self {
            name: self.name.clone(),
            color: self.color,
            size: self.size,
            price: self.price,
        }
    }
}

// regions are shared, so replicating a handle only adds another holder
impl Replicate for Arc<Region> {
    fn replicate(&self) -> Self {
        Arc::clone(self)
    }
}
