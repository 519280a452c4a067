//! Per-read options and their normalization against process-wide defaults.
//!
//! Per-call settings always win over the injected [`Defaults`]; anything left
//! unset after that falls back to the process environment and the
//! stdout/stderr sinks.
//!
//! Every options type also converts from a bare default value, so
//! `read_number("PORT", 8080)` is shorthand for
//! `read_number("PORT", Options::new().default_value(8080))`.

use crate::sink::Sink;
use crate::source::{EnvSource, Source};
use crate::{Result, SpConfError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A regular expression a present value must match.
///
/// Built from a compiled [`Regex`] or from its string form. A string wrapped in
/// slashes (`/^.{1,5}$/`) is taken as a delimited literal: the slashes are
/// stripped before compiling but kept when the pattern is shown in messages.
#[derive(Debug, Clone)]
pub struct Validator {
    regex: Regex,
    display: String,
}

impl Validator {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `SpConfError::InvalidPattern` if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let body = pattern
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
            .unwrap_or(pattern);

        Ok(Self {
            regex: Regex::new(body)?,
            display: pattern.to_string(),
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl From<Regex> for Validator {
    fn from(regex: Regex) -> Self {
        let display = format!("/{}/", regex.as_str());
        Self { regex, display }
    }
}

impl FromStr for Validator {
    type Err = SpConfError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Process-wide settings shared by every read that does not override them.
#[derive(Clone, Default)]
pub struct Defaults {
    pub(crate) source: Option<Arc<dyn Source>>,
    pub(crate) log: Option<Sink>,
    pub(crate) error: Option<Sink>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: impl Source + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn log(mut self, sink: Sink) -> Self {
        self.log = Some(sink);
        self
    }

    pub fn error(mut self, sink: Sink) -> Self {
        self.error = Some(sink);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.log.is_none() && self.error.is_none()
    }
}

impl fmt::Debug for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Defaults")
            .field("source", &self.source.as_ref().map(|_| ".."))
            .field("log", &self.log)
            .field("error", &self.error)
            .finish()
    }
}

/// Options for a single read producing a `T`.
#[derive(Clone)]
pub struct Options<T> {
    pub(crate) source: Option<Arc<dyn Source>>,
    pub(crate) log: Option<Sink>,
    pub(crate) error: Option<Sink>,
    pub(crate) validator: Option<Validator>,
    pub(crate) default_value: Option<T>,
    pub(crate) inner: bool,
}

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            source: None,
            log: None,
            error: None,
            validator: None,
            default_value: None,
            inner: false,
        }
    }
}

impl<T> Options<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: impl Source + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn log(mut self, sink: Sink) -> Self {
        self.log = Some(sink);
        self
    }

    pub fn error(mut self, sink: Sink) -> Self {
        self.error = Some(sink);
        self
    }

    /// Sets the pattern present values must match. Only string and URL reads
    /// consult it.
    pub fn validator(mut self, validator: impl Into<Validator>) -> Self {
        self.validator = Some(validator.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<T>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Marks the read as one attempt inside a fallback chain: failures are
    /// neither reported to the error sink nor recorded in the outcome flag.
    pub fn inner(mut self, inner: bool) -> Self {
        self.inner = inner;
        self
    }

    /// Fills unset fields from `defaults`, then from the built-in fallbacks.
    pub(crate) fn resolve(self, defaults: &Defaults) -> Resolved<T> {
        Resolved {
            source: self
                .source
                .or_else(|| defaults.source.clone())
                .unwrap_or_else(|| Arc::new(EnvSource)),
            log: self
                .log
                .or_else(|| defaults.log.clone())
                .unwrap_or_else(Sink::stdout),
            error: self
                .error
                .or_else(|| defaults.error.clone())
                .unwrap_or_else(Sink::stderr),
            validator: self.validator,
            default_value: self.default_value,
            inner: self.inner,
        }
    }
}

impl<T> From<T> for Options<T> {
    fn from(default_value: T) -> Self {
        Self::new().default_value(default_value)
    }
}

impl From<&str> for Options<String> {
    fn from(default_value: &str) -> Self {
        Self::new().default_value(default_value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("source", &self.source.as_ref().map(|_| ".."))
            .field("validator", &self.validator)
            .field("default_value", &self.default_value)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// Options after normalization: every collaborator is concrete.
#[derive(Clone)]
pub(crate) struct Resolved<T> {
    pub(crate) source: Arc<dyn Source>,
    pub(crate) log: Sink,
    pub(crate) error: Sink,
    pub(crate) validator: Option<Validator>,
    pub(crate) default_value: Option<T>,
    pub(crate) inner: bool,
}

/// One or more boolean vocabulary words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens(pub(crate) Vec<String>);

impl From<&str> for Tokens {
    fn from(token: &str) -> Self {
        Self(vec![token.to_lowercase()])
    }
}

impl From<String> for Tokens {
    fn from(token: String) -> Self {
        Self(vec![token.to_lowercase()])
    }
}

impl From<&[&str]> for Tokens {
    fn from(tokens: &[&str]) -> Self {
        Self(tokens.iter().map(|t| t.to_lowercase()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Tokens {
    fn from(tokens: [&str; N]) -> Self {
        Self(tokens.iter().map(|t| t.to_lowercase()).collect())
    }
}

impl From<Vec<&str>> for Tokens {
    fn from(tokens: Vec<&str>) -> Self {
        tokens.as_slice().into()
    }
}

impl From<Vec<String>> for Tokens {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens.iter().map(|t| t.to_lowercase()).collect())
    }
}

// Forwards the shared builder methods to the wrapped `Options`.
macro_rules! forward_options {
    ($ty:ty, $value:ty) => {
        impl $ty {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn source(mut self, source: impl Source + 'static) -> Self {
                self.base = self.base.source(source);
                self
            }

            pub fn log(mut self, sink: Sink) -> Self {
                self.base = self.base.log(sink);
                self
            }

            pub fn error(mut self, sink: Sink) -> Self {
                self.base = self.base.error(sink);
                self
            }

            pub fn default_value(mut self, value: impl Into<$value>) -> Self {
                self.base = self.base.default_value(value);
                self
            }

            pub fn inner(mut self, inner: bool) -> Self {
                self.base = self.base.inner(inner);
                self
            }
        }

        impl From<Options<$value>> for $ty {
            fn from(base: Options<$value>) -> Self {
                Self {
                    base,
                    ..Self::default()
                }
            }
        }
    };
}

/// Options for boolean reads.
///
/// `true_value` / `false_value` extend the built-in vocabularies
/// (`t`, `true`, `on`, `1` and `f`, `false`, `off`, `0`); matching is
/// case-insensitive. With `is_set_is_true` the value is ignored and only the
/// presence of the key counts.
#[derive(Debug, Clone, Default)]
pub struct BooleanOptions {
    pub(crate) base: Options<bool>,
    pub(crate) true_values: Vec<String>,
    pub(crate) false_values: Vec<String>,
    pub(crate) is_set_is_true: bool,
}

forward_options!(BooleanOptions, bool);

impl BooleanOptions {
    pub fn true_value(mut self, tokens: impl Into<Tokens>) -> Self {
        self.true_values.extend(tokens.into().0);
        self
    }

    pub fn false_value(mut self, tokens: impl Into<Tokens>) -> Self {
        self.false_values.extend(tokens.into().0);
        self
    }

    pub fn is_set_is_true(mut self, is_set_is_true: bool) -> Self {
        self.is_set_is_true = is_set_is_true;
        self
    }
}

impl From<bool> for BooleanOptions {
    fn from(default_value: bool) -> Self {
        Self::new().default_value(default_value)
    }
}

/// Options for certificate reads.
///
/// The markers only affect how the certificate is masked in log lines; the
/// value returned to the caller is always the raw text.
#[derive(Debug, Clone, Default)]
pub struct CertificateOptions {
    pub(crate) base: Options<String>,
    pub(crate) begin_certificate: Option<String>,
    pub(crate) end_certificate: Option<String>,
}

forward_options!(CertificateOptions, String);

impl CertificateOptions {
    pub fn begin_certificate(mut self, marker: impl Into<String>) -> Self {
        self.begin_certificate = Some(marker.into());
        self
    }

    pub fn end_certificate(mut self, marker: impl Into<String>) -> Self {
        self.end_certificate = Some(marker.into());
        self
    }
}

impl From<&str> for CertificateOptions {
    fn from(default_value: &str) -> Self {
        Self::new().default_value(default_value)
    }
}

impl From<String> for CertificateOptions {
    fn from(default_value: String) -> Self {
        Self::new().default_value(default_value)
    }
}
