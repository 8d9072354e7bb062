//! Configuration, and the template seeds that back registry factories.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional file, then `STENCIL_*` environment variables. A file can also
//! carry template seeds:
//!
//! ```toml
//! log_filter = "stencil=debug"
//! registry_capacity = 8
//!
//! [templates.main_office]
//! address = { street = "123 East Drive", city = "London", suite = 0 }
//!
//! [templates.aux_office]
//! address = { street = "123B East Drive", city = "London", suite = 0 }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use config::{Config, Environment, File};
pub use config::FileFormat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Address, Contact, Employment};
use crate::error::{Result, StencilError};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fallback filter for [`crate::init_tracing`] when `RUST_LOG` is unset.
    pub log_filter: String,
    pub registry_capacity: usize,
    pub templates: HashMap<String, TemplateSeed>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            registry_capacity: 16,
            templates: HashMap::new(),
        }
    }
}

impl Settings {
    /// Defaults, then `path` if given and present, then the environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("STENCIL").try_parsing(true));
        let settings: Settings = builder.build()?.try_deserialize()?;
        debug!(templates = settings.templates.len(), "settings loaded");
        Ok(settings)
    }

    /// Settings from text in the given format, on top of the defaults.
    pub fn from_text(text: &str, format: FileFormat) -> Result<Self> {
        Ok(Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from_str(text, format))
            .build()?
            .try_deserialize()?)
    }
}

// ------------- TemplateSeed -------------
/// Stored field values for one template.
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSeed {
    pub name: String,
    pub address: Address,
    pub employment: Employment,
}

impl TemplateSeed {
    pub fn to_contact(&self) -> Contact {
        Contact {
            name: self.name.clone(),
            address: self.address.clone(),
            employment: self.employment.clone(),
            region: None,
        }
    }
}

// ------------- TemplateSource -------------
/// Hands out registry factories that read their fields from the seeds.
#[derive(Clone, Debug)]
pub struct TemplateSource {
    seeds: Arc<HashMap<String, TemplateSeed>>,
}

impl TemplateSource {
    pub fn new(seeds: HashMap<String, TemplateSeed>) -> Self {
        Self {
            seeds: Arc::new(seeds),
        }
    }
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.templates.clone())
    }
    pub fn names(&self) -> Vec<&str> {
        self.seeds.keys().map(String::as_str).collect()
    }
    pub fn load(&self, name: &str) -> Result<Contact> {
        let seed = self
            .seeds
            .get(name)
            .ok_or_else(|| StencilError::Template(format!("no template named '{name}'")))?;
        if seed.address.street.is_empty() || seed.address.city.is_empty() {
            return Err(StencilError::Template(format!(
                "template '{name}' needs both a street and a city"
            )));
        }
        Ok(seed.to_contact())
    }
    /// A factory for [`crate::registry::Registry::get_or_try_create`].
    pub fn factory(&self, name: &str) -> impl FnOnce() -> Result<Contact> + use<> {
        let source = self.clone();
        let name = name.to_owned();
        move || source.load(&name)
    }
}
