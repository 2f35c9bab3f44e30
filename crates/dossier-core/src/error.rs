use thiserror::Error;

/// Top-level error type for the Dossier system.
///
/// Subsystem crates report failures through these variants so that the `?`
/// operator works across crate boundaries. None of them is fatal to a
/// pipeline run: the insight engine degrades around extraction and embedding
/// failures instead of propagating them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DossierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for DossierError {
    fn from(err: toml::de::Error) -> Self {
        DossierError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DossierError {
    fn from(err: toml::ser::Error) -> Self {
        DossierError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DossierError {
    fn from(err: serde_json::Error) -> Self {
        DossierError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Dossier operations.
pub type Result<T> = std::result::Result<T, DossierError>;
