//! Multi-stage fluent assembly of an entity's facets.
//!
//! A [`Session`] owns the one entity under construction. Facet views such as
//! [`AddressFacet`] and [`EmploymentFacet`] borrow the session, mutate their
//! own disjoint fields and hand the borrow on to the next facet, so the entity
//! is never copied between stages. The state machine is
//! `Start -> (facet)* -> Finalized`, and `Finalized` is terminal.
//!
//! ```
//! use stencil::builder::ContactBuilder;
//! use stencil::entity::Contact;
//!
//! let mut builder = ContactBuilder::start(Contact::new("John"));
//! let john = builder
//!     .lives().unwrap()
//!     .at("123 London Road")
//!     .in_city("London")
//!     .works()
//!     .at("Fabrikam")
//!     .as_a("Engineer")
//!     .earning(123_000)
//!     .finalize()
//!     .unwrap();
//! assert_eq!(john.address.city, "London");
//! assert!(builder.lives().is_err());
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::entity::{Address, Contact, Employment, Region};
use crate::error::{Result, StencilError};

pub const ADDRESS: &str = "address";
pub const EMPLOYMENT: &str = "employment";

// ------------- FieldValue -------------
/// A loosely typed value for the name-based protocol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FieldValue {
    Text(String),
    Number(u64),
    Date(NaiveDate),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Date(_) => "date",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}
impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}
impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(u64::from(value))
    }
}
impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value)
    }
}
impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// Entities that can be assembled facet by facet through names.
pub trait Faceted {
    /// Names of the facets, which partition the mutable fields.
    const FACETS: &'static [&'static str];
    fn set_field(&mut self, facet: &str, field: &str, value: FieldValue) -> Result<()>;
}

fn mismatch(facet: &str, field: &str, expected: &str, value: &FieldValue) -> StencilError {
    StencilError::InvalidArgument(format!(
        "{facet}.{field} expects {expected}, got {}",
        value.kind()
    ))
}

fn text(facet: &str, field: &str, value: FieldValue) -> Result<String> {
    match value {
        FieldValue::Text(s) => Ok(s),
        other => Err(mismatch(facet, field, "text", &other)),
    }
}

fn number(facet: &str, field: &str, value: FieldValue) -> Result<u64> {
    match value {
        FieldValue::Number(n) => Ok(n),
        other => Err(mismatch(facet, field, "a number", &other)),
    }
}

fn date(facet: &str, field: &str, value: FieldValue) -> Result<NaiveDate> {
    match value {
        FieldValue::Date(d) => Ok(d),
        FieldValue::Text(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
            StencilError::InvalidArgument(format!("{facet}.{field}: '{s}' is not a date: {e}"))
        }),
        other => Err(mismatch(facet, field, "a date", &other)),
    }
}

impl Faceted for Contact {
    const FACETS: &'static [&'static str] = &[ADDRESS, EMPLOYMENT];

    fn set_field(&mut self, facet: &str, field: &str, value: FieldValue) -> Result<()> {
        match (facet, field) {
            (ADDRESS, "street") => self.address.street = text(facet, field, value)?,
            (ADDRESS, "city") => self.address.city = text(facet, field, value)?,
            (ADDRESS, "postcode") => self.address.postcode = text(facet, field, value)?,
            (ADDRESS, "suite") => {
                let suite = number(facet, field, value)?;
                self.address.suite = u32::try_from(suite).map_err(|_| {
                    StencilError::InvalidArgument(format!("{facet}.{field}: {suite} is out of range"))
                })?;
            }
            (EMPLOYMENT, "company") => self.employment.company = text(facet, field, value)?,
            (EMPLOYMENT, "position") => self.employment.position = text(facet, field, value)?,
            (EMPLOYMENT, "annual_income") => {
                self.employment.annual_income = number(facet, field, value)?
            }
            (EMPLOYMENT, "since") => self.employment.since = Some(date(facet, field, value)?),
            _ => {
                return Err(StencilError::InvalidArgument(format!(
                    "facet '{facet}' has no field '{field}'"
                )));
            }
        }
        Ok(())
    }
}

// ------------- Session -------------
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    Start,
    Building,
    Finalized,
}

#[derive(Debug)]
pub struct Session<E> {
    target: E,
    state: SessionState,
}

pub type ContactBuilder = Session<Contact>;

impl<E> Session<E> {
    pub fn start(target: E) -> Self {
        Self {
            target,
            state: SessionState::Start,
        }
    }
    /// Like [`Session::start`], but for a target that may be absent.
    pub fn try_start(target: Option<E>) -> Result<Self> {
        target.map(Self::start).ok_or_else(|| {
            StencilError::InvalidArgument("a builder session needs a target entity".to_string())
        })
    }
    pub fn state(&self) -> SessionState {
        self.state
    }
    pub fn is_finalized(&self) -> bool {
        self.state == SessionState::Finalized
    }
    fn ensure_open(&self) -> Result<()> {
        if self.is_finalized() {
            return Err(StencilError::InvalidBuilderState(
                "the session has already been finalized".to_string(),
            ));
        }
        Ok(())
    }
    pub fn target(&self) -> Result<&E> {
        self.ensure_open()?;
        Ok(&self.target)
    }
    pub fn target_mut(&mut self) -> Result<&mut E> {
        self.ensure_open()?;
        self.state = SessionState::Building;
        Ok(&mut self.target)
    }
}

impl<E: Default> Session<E> {
    /// Hands the assembled entity back. Every later operation fails.
    pub fn finalize(&mut self) -> Result<E> {
        self.ensure_open()?;
        self.state = SessionState::Finalized;
        debug!("builder session finalized");
        Ok(std::mem::take(&mut self.target))
    }
}

impl<E: Faceted> Session<E> {
    /// Enters a facet by name.
    pub fn facet(&mut self, name: &str) -> Result<DynamicFacet<'_, E>> {
        self.ensure_open()?;
        let name = E::FACETS
            .iter()
            .copied()
            .find(|facet| *facet == name)
            .ok_or_else(|| StencilError::InvalidArgument(format!("unknown facet '{name}'")))?;
        self.state = SessionState::Building;
        Ok(DynamicFacet { session: self, name })
    }
}

pub struct DynamicFacet<'s, E> {
    session: &'s mut Session<E>,
    name: &'static str,
}

impl<'s, E: Faceted> DynamicFacet<'s, E> {
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn set(self, field: &str, value: impl Into<FieldValue>) -> Result<Self> {
        self.session
            .target_mut()?
            .set_field(self.name, field, value.into())?;
        Ok(self)
    }
    pub fn facet(self, name: &str) -> Result<DynamicFacet<'s, E>> {
        let session = self.session;
        session.facet(name)
    }
}

impl<E: Faceted + Default> DynamicFacet<'_, E> {
    pub fn finalize(self) -> Result<E> {
        self.session.finalize()
    }
}

// ------------- Contact facets -------------
impl Session<Contact> {
    pub fn named(&mut self, name: &str) -> Result<&mut Self> {
        self.target_mut()?.name = name.to_owned();
        Ok(self)
    }
    pub fn in_region(&mut self, region: Arc<Region>) -> Result<&mut Self> {
        self.target_mut()?.region = Some(region);
        Ok(self)
    }
    pub fn lives(&mut self) -> Result<AddressFacet<'_>> {
        self.target_mut()?;
        Ok(AddressFacet { session: self })
    }
    pub fn works(&mut self) -> Result<EmploymentFacet<'_>> {
        self.target_mut()?;
        Ok(EmploymentFacet { session: self })
    }
}

// While a view holds the borrow nobody can finalize the session, so its
// setters reach the target directly and never fail.
pub struct AddressFacet<'s> {
    session: &'s mut ContactBuilder,
}

impl<'s> AddressFacet<'s> {
    fn address(&mut self) -> &mut Address {
        &mut self.session.target.address
    }
    pub fn at(mut self, street: &str) -> Self {
        self.address().street = street.to_owned();
        self
    }
    pub fn in_city(mut self, city: &str) -> Self {
        self.address().city = city.to_owned();
        self
    }
    pub fn with_postcode(mut self, postcode: &str) -> Self {
        self.address().postcode = postcode.to_owned();
        self
    }
    pub fn suite(mut self, suite: u32) -> Self {
        self.address().suite = suite;
        self
    }
    pub fn works(self) -> EmploymentFacet<'s> {
        EmploymentFacet {
            session: self.session,
        }
    }
    pub fn finalize(self) -> Result<Contact> {
        self.session.finalize()
    }
}

pub struct EmploymentFacet<'s> {
    session: &'s mut ContactBuilder,
}

impl<'s> EmploymentFacet<'s> {
    fn employment(&mut self) -> &mut Employment {
        &mut self.session.target.employment
    }
    pub fn at(mut self, company: &str) -> Self {
        self.employment().company = company.to_owned();
        self
    }
    pub fn as_a(mut self, position: &str) -> Self {
        self.employment().position = position.to_owned();
        self
    }
    pub fn earning(mut self, annual_income: u64) -> Self {
        self.employment().annual_income = annual_income;
        self
    }
    pub fn since(mut self, date: NaiveDate) -> Self {
        self.employment().since = Some(date);
        self
    }
    pub fn office(mut self, office: Address) -> Self {
        self.employment().office = Some(Box::new(office));
        self
    }
    pub fn lives(self) -> AddressFacet<'s> {
        AddressFacet {
            session: self.session,
        }
    }
    pub fn finalize(self) -> Result<Contact> {
        self.session.finalize()
    }
}
