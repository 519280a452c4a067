//! The process-wide resolution pass.
//!
//! These functions delegate to a single [`Resolver`] shared by the whole
//! process, for the common case of reading all configuration once at startup
//! and then checking [`missing_env_vars`] before continuing.

use crate::options::{BooleanOptions, CertificateOptions, Options};
use crate::resolver::{Keys, Resolver};
use crate::sink::Sink;
use crate::source::Source;
use std::sync::LazyLock;

static RESOLVER: LazyLock<Resolver> = LazyLock::new(Resolver::new);

/// The process-wide resolver.
pub fn resolver() -> &'static Resolver {
    &RESOLVER
}

/// Whether any required value failed to resolve since the last [`reset`].
pub fn missing_env_vars() -> bool {
    RESOLVER.missing_env_vars()
}

/// Clears the outcome flag and the injected source and sinks.
pub fn reset() {
    RESOLVER.reset();
}

pub fn set_default_source(source: impl Source + 'static) {
    RESOLVER.set_default_source(source);
}

pub fn set_default_log(sink: Sink) {
    RESOLVER.set_default_log(sink);
}

pub fn set_default_error(sink: Sink) {
    RESOLVER.set_default_error(sink);
}

pub fn read_string(keys: impl Into<Keys>, options: impl Into<Options<String>>) -> Option<String> {
    RESOLVER.read_string(keys, options)
}

pub fn read_number(keys: impl Into<Keys>, options: impl Into<Options<i64>>) -> Option<i64> {
    RESOLVER.read_number(keys, options)
}

pub fn read_boolean(keys: impl Into<Keys>, options: impl Into<BooleanOptions>) -> Option<bool> {
    RESOLVER.read_boolean(keys, options)
}

pub fn read_password(keys: impl Into<Keys>, options: impl Into<Options<String>>) -> Option<String> {
    RESOLVER.read_password(keys, options)
}

pub fn read_certificate(
    keys: impl Into<Keys>,
    options: impl Into<CertificateOptions>,
) -> Option<String> {
    RESOLVER.read_certificate(keys, options)
}

pub fn read_url(keys: impl Into<Keys>, options: impl Into<Options<String>>) -> Option<String> {
    RESOLVER.read_url(keys, options)
}
