//! Stencil – keyed prototypes, deep replication, facet builders and
//! specification queries for in-process object graphs.
//!
//! The library revolves around a small lifecycle:
//! * A [`registry::Registry`] keeps one *prototype* per key, created lazily and
//!   exactly once by a caller supplied factory, and hands out read-only
//!   [`registry::Prototype`] handles to it.
//! * [`replicate::Replicate`] turns a prototype into an owned instance that
//!   shares none of its owned sub-records.
//! * A [`builder::Session`] customizes that instance facet by facet (for a
//!   [`entity::Contact`], its address and its employment).
//! * A [`specification::Specification`] expression, built from atomic
//!   [`predicates`] and the `And`/`Or`/`Not` combinators, is handed to the
//!   [`query::QueryEngine`] to filter collections.
//!
//! ## Modules
//! * [`entity`] – The data shapes: contacts with owned address and employment
//!   blocks, shared regions, and products.
//! * [`replicate`] – Explicit deep copies.
//! * [`builder`] – The multi-stage facet builder.
//! * [`registry`] – The prototype keeper.
//! * [`specification`] – The predicate trait and its combinators.
//! * [`predicates`] – Atomic predicates over the entity model.
//! * [`query`] – Filtering and selection over collections.
//! * [`settings`] – Layered configuration and configured template seeds.
//!
//! ## Quick Start
//! ```
//! use stencil::builder::ContactBuilder;
//! use stencil::entity::{Address, Contact};
//! use stencil::registry::Registry;
//!
//! let registry = Registry::<&str, Contact>::new();
//! let office = registry
//!     .get_or_create("main_office", || {
//!         Contact::with_address("", Address::new("123 East Drive", "London", 0))
//!     })
//!     .unwrap();
//!
//! let mut builder = ContactBuilder::start(office.instantiate());
//! builder.named("John").unwrap();
//! let john = builder.lives().unwrap().suite(123).finalize().unwrap();
//!
//! assert_eq!(john.address.suite, 123);
//! assert_eq!(office.address.suite, 0);
//! ```
//!
//! ## Concurrency
//! Only the registry coordinates between threads, and only when a key is seen
//! for the first time. Replication, builders and queries run on the calling
//! thread and take no locks.

pub mod builder;
pub mod entity;
pub mod error;
pub mod predicates;
pub mod query;
pub mod registry;
pub mod replicate;
pub mod settings;
pub mod specification;

pub use error::{Result, StencilError};

use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Installs a formatting subscriber. `RUST_LOG` takes precedence over
/// `settings.log_filter`. Does nothing if a subscriber is already set.
pub fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
