//! # Configuration manifests
//!
//! A manifest declares every variable an application reads, so the whole
//! configuration can be resolved (and checked) in one call instead of a
//! sequence of hand-written reads.
//!
//! ```toml
//! [vars.port]
//! type = "number"
//! keys = ["PORT"]
//! default = 8080
//!
//! [vars.user]
//! type = "string"
//! keys = ["CURRENT_USER", "DEFAULT_USER"]
//!
//! [vars.db_host]
//! type = "string"
//! keys = ["DB_HOST_IP"]
//! validator = '^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$'
//!
//! [vars.db_password]
//! type = "password"
//! keys = ["DB_PASSWORD"]
//! ```
//!
//! Several keys form a fallback chain, tried left to right.

use crate::coerce::ValueKind;
use crate::obfuscate::{obfuscate, obfuscate_auth, obfuscate_certificate};
use crate::options::{BooleanOptions, CertificateOptions, Options, Validator};
use crate::resolver::{Keys, Resolver};
use crate::{Result, SpConfError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// The root of a `spconf.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Variables by name. Resolution happens in name order.
    #[serde(default)]
    pub vars: BTreeMap<String, Var>,
}

/// One declared variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Var {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    /// One key, or several forming a fallback chain.
    pub keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<toml::Value>,
    /// String and url variables only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub true_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub false_values: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_set_is_true: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_certificate: Option<String>,
}

impl Manifest {
    /// Reads and validates a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`validate`](Self::validate).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Checks every variable for a usable declaration.
    ///
    /// Ensures that:
    /// - every variable has at least one key
    /// - defaults have the TOML type matching the variable type
    /// - validators compile and are only set on string or url variables
    /// - boolean and certificate settings only appear on those variable types
    pub fn validate(&self) -> Result<()> {
        for (name, var) in &self.vars {
            var.validate()
                .map_err(|e| SpConfError::InvalidManifest(format!("Variable '{}': {}", name, e)))?;
        }
        Ok(())
    }
}

impl FromStr for Manifest {
    type Err = SpConfError;

    fn from_str(s: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }
}

impl Var {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.keys.is_empty() {
            return Err("at least one key is required".into());
        }

        if let Some(default) = &self.default {
            let matches = match self.kind {
                ValueKind::Number => default.is_integer(),
                ValueKind::Boolean => default.is_bool(),
                _ => default.is_str(),
            };
            if !matches {
                return Err(format!(
                    "default must be a {} value, got {}",
                    self.kind,
                    default.type_str()
                ));
            }
        }

        if let Some(pattern) = &self.validator {
            if !matches!(self.kind, ValueKind::String | ValueKind::Url) {
                return Err("validator is only supported for string and url variables".into());
            }
            Validator::new(pattern).map_err(|e| e.to_string())?;
        }

        let boolean_settings =
            !self.true_values.is_empty() || !self.false_values.is_empty() || self.is_set_is_true;
        if boolean_settings && self.kind != ValueKind::Boolean {
            return Err(
                "true_values, false_values and is_set_is_true are only supported for boolean variables"
                    .into(),
            );
        }

        let certificate_settings = self.begin_certificate.is_some() || self.end_certificate.is_some();
        if certificate_settings && self.kind != ValueKind::Certificate {
            return Err(
                "begin_certificate and end_certificate are only supported for certificate variables"
                    .into(),
            );
        }

        Ok(())
    }

    fn keys(&self) -> Keys {
        match self.keys.as_slice() {
            [key] => Keys::Single(key.clone()),
            keys => Keys::Chain(keys.to_vec()),
        }
    }

    fn text_options(&self) -> Result<Options<String>> {
        let options = self.unvalidated_text_options();
        match &self.validator {
            Some(pattern) => Ok(options.validator(Validator::new(pattern)?)),
            None => Ok(options),
        }
    }

    fn unvalidated_text_options(&self) -> Options<String> {
        match self.default.as_ref().and_then(|d| d.as_str()) {
            Some(default) => Options::new().default_value(default),
            None => Options::new(),
        }
    }

    fn number_options(&self) -> Options<i64> {
        match self.default.as_ref().and_then(|d| d.as_integer()) {
            Some(default) => Options::new().default_value(default),
            None => Options::new(),
        }
    }

    fn boolean_options(&self) -> BooleanOptions {
        let mut options = BooleanOptions::new()
            .true_value(self.true_values.clone())
            .false_value(self.false_values.clone())
            .is_set_is_true(self.is_set_is_true);
        if let Some(default) = self.default.as_ref().and_then(|d| d.as_bool()) {
            options = options.default_value(default);
        }
        options
    }

    fn certificate_options(&self) -> CertificateOptions {
        let mut options = CertificateOptions::from(self.unvalidated_text_options());
        if let Some(marker) = &self.begin_certificate {
            options = options.begin_certificate(marker.clone());
        }
        if let Some(marker) = &self.end_certificate {
            options = options.end_certificate(marker.clone());
        }
        options
    }
}

/// A resolved variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Number(i64),
    Boolean(bool),
    Password(String),
    Certificate {
        text: String,
        begin: Option<String>,
        end: Option<String>,
    },
    Url(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Password(_) => ValueKind::Password,
            Value::Certificate { .. } => ValueKind::Certificate,
            Value::Url(_) => ValueKind::Url,
        }
    }

    /// The raw text of string-like values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Password(s) | Value::Url(s) => Some(s),
            Value::Certificate { text, .. } => Some(text),
            Value::Number(_) | Value::Boolean(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Shows the value the way the audit log does: sensitive values are masked.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Password(s) => f.write_str(&obfuscate(s)),
            Value::Certificate { text, begin, end } => f.write_str(&obfuscate_certificate(
                text,
                begin.as_deref(),
                end.as_deref(),
            )),
            Value::Url(s) => f.write_str(&obfuscate_auth(s)),
        }
    }
}

/// The outcome of resolving a manifest.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    /// Values for every variable that resolved.
    pub values: BTreeMap<String, Value>,
    /// Names of variables that did not resolve.
    pub missing: Vec<String>,
}

impl ResolvedConfig {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether every variable resolved.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

impl Resolver {
    /// Reads every variable in `manifest`, in name order.
    ///
    /// Failures are reported exactly as individual reads report them and set
    /// this resolver's outcome flag; the names of unresolved variables are
    /// also collected in [`ResolvedConfig::missing`].
    ///
    /// # Errors
    ///
    /// Returns `SpConfError::InvalidPattern` if a validator does not compile.
    pub fn resolve_manifest(&self, manifest: &Manifest) -> Result<ResolvedConfig> {
        let mut resolved = ResolvedConfig::default();

        for (name, var) in &manifest.vars {
            tracing::debug!(var = %name, kind = %var.kind, "resolving manifest variable");

            let keys = var.keys();
            let value = match var.kind {
                ValueKind::String => self.read_string(keys, var.text_options()?).map(Value::String),
                ValueKind::Number => self.read_number(keys, var.number_options()).map(Value::Number),
                ValueKind::Boolean => self.read_boolean(keys, var.boolean_options()).map(Value::Boolean),
                ValueKind::Password => self
                    .read_password(keys, var.unvalidated_text_options())
                    .map(Value::Password),
                ValueKind::Certificate => self
                    .read_certificate(keys, var.certificate_options())
                    .map(|text| Value::Certificate {
                        text,
                        begin: var.begin_certificate.clone(),
                        end: var.end_certificate.clone(),
                    }),
                ValueKind::Url => self.read_url(keys, var.text_options()?).map(Value::Url),
            };

            match value {
                Some(value) => {
                    resolved.values.insert(name.clone(), value);
                }
                None => resolved.missing.push(name.clone()),
            }
        }

        Ok(resolved)
    }
}
