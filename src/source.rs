//! # Sources
//!
//! A [`Source`] is the key-value mapping reads are resolved against. An absent
//! key (`None`) is distinct from a key set to the empty string.
//!
//! ## Available Sources
//!
//! - [`EnvSource`]: the process environment (the default)
//! - [`DotEnvSource`]: a `.env` file loaded once up front
//! - `HashMap<String, String>` / `BTreeMap<String, String>`: in-memory maps,
//!   mostly for tests

use crate::Result;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::{Path, PathBuf};

/// Read-only key-value mapping consulted by every read.
///
/// Sources must be `Send + Sync` so they can be shared through the
/// process-wide defaults.
pub trait Source: Send + Sync {
    /// Returns the value for `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns whether `key` is present, whatever its value.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Reads from the process environment.
///
/// Variables whose value is not valid unicode are treated as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl Source for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn contains(&self, key: &str) -> bool {
        env::var_os(key).is_some()
    }
}

impl Source for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl Source for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

/// A `.env` file, parsed with `dotenvy` when the source is created.
///
/// A missing file yields an empty source rather than an error, so optional
/// local overrides can be wired in unconditionally.
#[derive(Debug, Clone)]
pub struct DotEnvSource {
    path: PathBuf,
    vars: HashMap<String, String>,
}

impl DotEnvSource {
    /// Loads the variables in `path`.
    ///
    /// # Errors
    ///
    /// Returns `SpConfError::Dotenv` if the file exists but cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut vars = HashMap::new();

        if path.exists() {
            for item in dotenvy::from_path_iter(&path)? {
                let (key, value) = item?;
                vars.insert(key, value);
            }
        }

        tracing::debug!(path = %path.display(), count = vars.len(), "loaded dotenv source");
        Ok(Self { path, vars })
    }

    /// The file this source was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Source for DotEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
