
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum StencilError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid builder state: {0}")]
    InvalidBuilderState(String),
    #[error("Registry error: factory for key {key} failed: {source}")]
    Registry { key: String, #[source] source: BoxedSource },
    #[error("Template error: {0}")]
    Template(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, StencilError>;

// Helper conversions
impl From<config::ConfigError> for StencilError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl<T> From<std::sync::PoisonError<T>> for StencilError {
    fn from(e: std::sync::PoisonError<T>) -> Self { Self::Lock(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_keeps_its_source() {
        let err = StencilError::Registry {
            key: "\"main_office\"".to_string(),
            source: "storage offline".into(),
        };
        assert!(err.to_string().contains("main_office"));
        assert_eq!(std::error::Error::source(&err).unwrap().to_string(), "storage offline");
    }
}
