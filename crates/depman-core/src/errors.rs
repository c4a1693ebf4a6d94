use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all depman operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DepmanError {
    /// A coordinate with an empty group or artifact was declared.
    #[error("Invalid coordinate: {message}")]
    #[diagnostic(help("Coordinates must have a non-empty group and artifact"))]
    InvalidCoordinate { message: String },

    /// A referenced BOM could not be loaded. Fatal to snapshot construction.
    #[error("Unresolvable BOM {reference}: {message}")]
    #[diagnostic(help(
        "A missing BOM means managed versions would be silently wrong; fix the import or the loader"
    ))]
    UnresolvableBom { reference: String, message: String },

    /// Invalid or malformed management configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A POM/BOM descriptor document could not be parsed.
    #[error("Descriptor parse error: {message}")]
    Parse { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type DepmanResult<T> = miette::Result<T>;
