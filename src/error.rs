//! Error types for spconf operations

use crate::coerce::ValueKind;
use thiserror::Error;

/// The main error type for fallible spconf operations
///
/// Reads themselves never fail with this type. It covers the setup work around
/// them: compiling validator patterns, loading `.env` files and parsing manifests.
#[derive(Error, Debug)]
pub enum SpConfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Dotenv error: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Invalid validator pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}

/// A type alias for `Result<T, SpConfError>`
pub type Result<T> = std::result::Result<T, SpConfError>;

/// Why a read could not produce a value.
///
/// These are reported through the error sink and recorded in the outcome flag,
/// never returned as `Err`. The `Display` output is the exact audit message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadFailure {
    /// Key absent, no default, outermost call.
    #[error("Required {} env var \"{}\" was not supplied.", .kind.required_label(), .key)]
    MissingRequired { kind: ValueKind, key: String },

    /// Key present but rejected by the validator. `shown` is the value as it
    /// may appear in logs (URL passwords already masked).
    #[error(
        "Expected env var \"{}\" to be match pattern \"{}\" but was \"{}\" and did not.",
        .key,
        .pattern,
        .shown
    )]
    ValidationFailed {
        key: String,
        pattern: String,
        shown: String,
    },

    /// Type coercion failure for numbers.
    #[error("Expected env var \"{}\" to be numeric but was \"{}\".", .key, .value)]
    NotNumeric { key: String, value: String },

    /// Type coercion failure for booleans.
    #[error("Expected env var \"{}\" to be a bool but was \"{}\".", .key, .value)]
    NotBoolean { key: String, value: String },

    /// Every key of a fallback chain failed and no default applied.
    #[error(
        "At least one of required {}s \"{}\" was not supplied.",
        .kind.label(),
        .keys.join("\" or \"")
    )]
    FallbackExhausted { kind: ValueKind, keys: Vec<String> },
}
