//! The typed-read engine.
//!
//! A [`Resolver`] owns the state of one resolution pass: the injected
//! [`Defaults`] and the monotonic "missing env vars" flag. Every typed read
//! normalizes its options, then either resolves a single key or walks a
//! fallback chain, with the same [`Coerce`] strategy driving both.

use crate::coerce::{
    Attempt, BooleanCoercer, CertificateCoercer, Coerce, NumberCoercer, PasswordCoercer,
    StringCoercer, UrlCoercer,
};
use crate::error::ReadFailure;
use crate::options::{BooleanOptions, CertificateOptions, Defaults, Options, Resolved};
use crate::sink::Sink;
use crate::source::Source;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The key argument of a read: one key, or an ordered fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    Single(String),
    Chain(Vec<String>),
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Keys::Single(key.to_string())
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Keys::Single(key)
    }
}

impl From<&String> for Keys {
    fn from(key: &String) -> Self {
        Keys::Single(key.clone())
    }
}

impl From<&[&str]> for Keys {
    fn from(keys: &[&str]) -> Self {
        Keys::Chain(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(keys: [&str; N]) -> Self {
        Keys::Chain(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl From<Vec<&str>> for Keys {
    fn from(keys: Vec<&str>) -> Self {
        keys.as_slice().into()
    }
}

impl From<Vec<String>> for Keys {
    fn from(keys: Vec<String>) -> Self {
        Keys::Chain(keys)
    }
}

/// Reads typed configuration values and records whether any required value
/// was missing.
///
/// The free functions in the crate root use one process-wide `Resolver`;
/// construct your own for an isolated pass.
///
/// # Example
///
/// ```
/// use spconf::{Defaults, Options, RecordingSink, Resolver};
/// use std::collections::HashMap;
///
/// let log = RecordingSink::new();
/// let source = HashMap::from([("PORT".to_string(), "8080".to_string())]);
/// let resolver = Resolver::with_defaults(Defaults::new().source(source).log(log.sink()));
///
/// assert_eq!(resolver.read_number("PORT", Options::new()), Some(8080));
/// assert_eq!(resolver.read_string(["USER", "LOGNAME"], "nobody"), Some("nobody".to_string()));
/// assert!(!resolver.missing_env_vars());
/// assert_eq!(log.lines()[0], "Using env var PORT 8080");
/// ```
#[derive(Debug, Default)]
pub struct Resolver {
    defaults: RwLock<Defaults>,
    missing: AtomicBool,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: Defaults) -> Self {
        Self {
            defaults: RwLock::new(defaults),
            missing: AtomicBool::new(false),
        }
    }

    /// Whether any outermost read in this pass failed without a default.
    pub fn missing_env_vars(&self) -> bool {
        self.missing.load(Ordering::SeqCst)
    }

    /// Clears the outcome flag and every injected default.
    pub fn reset(&self) {
        self.missing.store(false, Ordering::SeqCst);
        *self.defaults.write() = Defaults::default();
    }

    /// A copy of the currently injected defaults.
    pub fn defaults(&self) -> Defaults {
        self.defaults.read().clone()
    }

    pub fn set_defaults(&self, defaults: Defaults) {
        *self.defaults.write() = defaults;
    }

    pub fn set_default_source(&self, source: impl Source + 'static) {
        self.defaults.write().source = Some(Arc::new(source));
    }

    pub fn set_default_log(&self, sink: Sink) {
        self.defaults.write().log = Some(sink);
    }

    pub fn set_default_error(&self, sink: Sink) {
        self.defaults.write().error = Some(sink);
    }

    pub fn read_string(
        &self,
        keys: impl Into<Keys>,
        options: impl Into<Options<String>>,
    ) -> Option<String> {
        self.read(&StringCoercer, keys, options)
    }

    pub fn read_number(
        &self,
        keys: impl Into<Keys>,
        options: impl Into<Options<i64>>,
    ) -> Option<i64> {
        self.read(&NumberCoercer, keys, options)
    }

    pub fn read_boolean(
        &self,
        keys: impl Into<Keys>,
        options: impl Into<BooleanOptions>,
    ) -> Option<bool> {
        let options = options.into();
        let coercer = BooleanCoercer {
            true_values: options.true_values,
            false_values: options.false_values,
            is_set_is_true: options.is_set_is_true,
        };
        self.read(&coercer, keys, options.base)
    }

    /// Like [`read_string`](Self::read_string) without validation; values are
    /// masked in every log line.
    pub fn read_password(
        &self,
        keys: impl Into<Keys>,
        options: impl Into<Options<String>>,
    ) -> Option<String> {
        self.read(&PasswordCoercer, keys, options)
    }

    pub fn read_certificate(
        &self,
        keys: impl Into<Keys>,
        options: impl Into<CertificateOptions>,
    ) -> Option<String> {
        let options = options.into();
        let coercer = CertificateCoercer {
            begin_certificate: options.begin_certificate,
            end_certificate: options.end_certificate,
        };
        self.read(&coercer, keys, options.base)
    }

    /// Like [`read_string`](Self::read_string), but URL passwords are masked in
    /// every log line. The validator still sees the raw value.
    pub fn read_url(
        &self,
        keys: impl Into<Keys>,
        options: impl Into<Options<String>>,
    ) -> Option<String> {
        self.read(&UrlCoercer, keys, options)
    }

    /// Resolves `keys` with any single-key strategy.
    pub fn read<C: Coerce>(
        &self,
        coercer: &C,
        keys: impl Into<Keys>,
        options: impl Into<Options<C::Value>>,
    ) -> Option<C::Value> {
        let options = options.into().resolve(&self.defaults.read());

        match keys.into() {
            Keys::Single(key) => self.read_single(coercer, &key, &options),
            Keys::Chain(keys) => self.try_each(coercer, &keys, options),
        }
    }

    fn read_single<C: Coerce>(
        &self,
        coercer: &C,
        key: &str,
        options: &Resolved<C::Value>,
    ) -> Option<C::Value> {
        match coercer.attempt(key, &*options.source, options.validator.as_ref()) {
            Attempt::Found { value, shown } => {
                options.log.emit(&format!("Using env var {key} {shown}"));
                Some(value)
            }
            Attempt::Rejected(failure) => {
                if !options.inner {
                    self.fail(options, failure);
                }
                None
            }
            Attempt::Absent => {
                if let Some(value) = &options.default_value {
                    options.log.emit(&format!(
                        "{} {key} {}",
                        coercer.kind().default_prefix(),
                        coercer.render(value)
                    ));
                    Some(value.clone())
                } else if options.inner {
                    None
                } else if let Some((value, shown)) = coercer.unset() {
                    options.log.emit(&format!("Using env var {key} {shown}"));
                    Some(value)
                } else {
                    let failure = ReadFailure::MissingRequired {
                        kind: coercer.kind(),
                        key: key.to_string(),
                    };
                    self.fail(options, failure);
                    None
                }
            }
        }
    }

    /// Tries each key in order; the first success wins and later keys are not
    /// consulted.
    fn try_each<C: Coerce>(
        &self,
        coercer: &C,
        keys: &[String],
        options: Resolved<C::Value>,
    ) -> Option<C::Value> {
        let kind = coercer.kind();
        let inner = Resolved {
            default_value: None,
            inner: true,
            ..options.clone()
        };

        for key in keys {
            if let Some(value) = self.read_single(coercer, key, &inner) {
                return Some(value);
            }
            tracing::debug!(key = %key, kind = %kind, "fallback attempt failed");
            options.log.emit(&format!("Could not use {kind} \"{key}\"."));
        }

        if let Some(value) = options.default_value {
            options.log.emit(&format!(
                "Using default for {} {}",
                keys.join(","),
                coercer.render(&value)
            ));
            return Some(value);
        }

        if let Some((value, shown)) = coercer.unset() {
            options
                .log
                .emit(&format!("Using env var {} {shown}", keys.join(",")));
            return Some(value);
        }

        let failure = ReadFailure::FallbackExhausted {
            kind,
            keys: keys.to_vec(),
        };
        self.fail(&options, failure);
        None
    }

    fn fail<T>(&self, options: &Resolved<T>, failure: ReadFailure) {
        self.missing.store(true, Ordering::SeqCst);
        options.error.emit(&failure.to_string());
    }
}
