//! The owned-graph data shapes that get provisioned and queried.
//!
//! A [`Contact`] exclusively owns its [`Address`] and [`Employment`] blocks,
//! and the employment block may in turn own an office [`Address`]. The only
//! thing a contact does not own is its [`Region`], a lookup table that many
//! contacts refer to through an `Arc`.
//!
//! Contacts and products do not implement `Clone`. Copies are made through
//! [`crate::replicate::Replicate`] so that every deep copy is visible at the
//! call site.

use std::sync::Arc;

// used for the start date of an employment
use chrono::NaiveDate;
// address and employment blocks can be seeded from configuration
use serde::{Deserialize, Serialize};

// ------------- Region -------------
/// Shared lookup data. Many contacts point at the same region and cloning a
/// contact never copies it.
#[derive(PartialEq, Eq, Debug)]
pub struct Region {
    code: String,
    name: String,
    dialing_prefix: String,
}

impl Region {
    pub fn new(code: &str, name: &str, dialing_prefix: &str) -> Self {
        Self {
            code: code.to_owned(),
            name: name.to_owned(),
            dialing_prefix: dialing_prefix.to_owned(),
        }
    }
    // Regions are shared between many contacts, so they are only readable
    // through getters once created.
    pub fn code(&self) -> &str {
        &self.code
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn dialing_prefix(&self) -> &str {
        &self.dialing_prefix
    }
}

// ------------- Address -------------
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postcode: String,
    pub suite: u32,
}

impl Address {
    pub fn new(street: &str, city: &str, suite: u32) -> Self {
        Self {
            street: street.to_owned(),
            city: city.to_owned(),
            postcode: String::new(),
            suite,
        }
    }
}

// ------------- Employment -------------
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Employment {
    pub company: String,
    pub position: String,
    pub annual_income: u64,
    pub since: Option<NaiveDate>,
    // owned, one level further down than the home address
    pub office: Option<Box<Address>>,
}

// ------------- Contact -------------
#[derive(PartialEq, Eq, Default, Debug)]
pub struct Contact {
    pub name: String,
    pub address: Address,
    pub employment: Employment,
    pub region: Option<Arc<Region>>,
}

impl Contact {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }
    pub fn with_address(name: &str, address: Address) -> Self {
        Self {
            name: name.to_owned(),
            address,
            ..Default::default()
        }
    }
    /// True when both contacts refer to the very same region table.
    pub fn shares_region_with(&self, other: &Contact) -> bool {
        match (&self.region, &other.region) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ------------- Product -------------
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Red,
    Green,
    Blue,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Size {
    Small,
    Medium,
    Large,
}

#[derive(PartialEq, Eq, Debug)]
pub struct Product {
    pub name: String,
    pub color: Color,
    pub size: Size,
    pub price: u32,
}

impl Product {
    pub fn new(name: &str, color: Color, size: Size, price: u32) -> Self {
        Self {
            name: name.to_owned(),
            color,
            size,
            price,
        }
    }
}
