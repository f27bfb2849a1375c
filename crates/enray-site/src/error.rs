//! Error types for the site layer.
//!
//! Only data problems are errors. Validation failures are ordinary values
//! (see [`FieldError`](crate::form::FieldError)) and missing page elements
//! are `None` at the binding layer.

/// Result type alias for site operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data or resolving content.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The gallery JSON could not be parsed.
    #[error("Failed to parse gallery data: {0}")]
    GalleryParse(#[source] serde_json::Error),

    /// Two gallery categories share an id.
    #[error("Duplicate gallery category '{0}'")]
    DuplicateCategory(String),

    /// TOML configuration could not be parsed.
    #[error("Invalid TOML configuration: {0}")]
    ConfigToml(#[from] toml::de::Error),

    /// JSON configuration could not be parsed.
    #[error("Invalid JSON configuration: {0}")]
    ConfigJson(#[source] serde_json::Error),

    /// No gallery category has the requested id.
    #[error("Unknown gallery category '{0}'")]
    UnknownCategory(String),

    /// A gallery category has no images to show.
    #[error("Gallery category '{0}' has no images")]
    EmptyGallery(String),

    /// A validation pattern failed to compile.
    #[error("Invalid validation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl Error {
    /// Create an unknown-category error.
    pub fn unknown_category(id: impl Into<String>) -> Self {
        Self::UnknownCategory(id.into())
    }

    /// Create an empty-gallery error.
    pub fn empty_gallery(id: impl Into<String>) -> Self {
        Self::EmptyGallery(id.into())
    }
}
