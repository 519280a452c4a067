//! spconf - typed, validated environment configuration with masked audit logging
//!
//! Reads strings, numbers, booleans, passwords, certificates and URLs from a
//! key-value source (the process environment by default), applies validators,
//! fallback chains and defaults, and writes one audit line per read in which
//! sensitive values are masked.
//!
//! # Features
//!
//! - **Typed reads**: `read_string`, `read_number`, `read_boolean`,
//!   `read_password`, `read_certificate`, `read_url`
//! - **Fallback chains**: pass several keys and the first usable one wins
//! - **Masked audit trail**: passwords, certificate bodies and URL passwords
//!   never reach a log line in plaintext
//! - **Deferred failure**: failures are reported and recorded, never thrown,
//!   so every problem is listed before startup aborts
//! - **Manifests**: declare the whole configuration in `spconf.toml`
//!
//! # Example
//!
//! ```no_run
//! use spconf::{missing_env_vars, read_boolean, read_number, read_password, read_string, Options};
//!
//! let port = read_number("PORT", 8080_i64);
//! let user = read_string(["CURRENT_USER", "DEFAULT_USER"], Options::new());
//! let password = read_password("DB_PASSWORD", Options::new());
//! let keep_open = read_boolean("KEEP_CONNECTION_OPEN", false);
//!
//! if missing_env_vars() {
//!     eprintln!("Some required env vars were missing. Terminating");
//!     std::process::exit(1);
//! }
//! ```

mod coerce;
mod error;
mod global;
mod manifest;
mod obfuscate;
mod options;
mod resolver;
mod sink;
mod source;

pub use coerce::{
    Attempt, BooleanCoercer, CertificateCoercer, Coerce, NumberCoercer, PasswordCoercer,
    StringCoercer, UrlCoercer, ValueKind,
};
pub use error::{ReadFailure, Result, SpConfError};
pub use global::{
    missing_env_vars, read_boolean, read_certificate, read_number, read_password, read_string,
    read_url, reset, resolver, set_default_error, set_default_log, set_default_source,
};
pub use manifest::{Manifest, ResolvedConfig, Value, Var};
pub use obfuscate::{
    CERTIFICATE_FOOTER, CERTIFICATE_HEADER, obfuscate, obfuscate_auth, obfuscate_certificate,
};
pub use options::{BooleanOptions, CertificateOptions, Defaults, Options, Tokens, Validator};
pub use resolver::{Keys, Resolver};
pub use sink::{RecordingSink, Sink};
pub use source::{DotEnvSource, EnvSource, Source};
