//! Reads a service configuration at startup and exits if anything required is
//! missing.
//!
//! ```sh
//! PORT=9000 DEFAULT_USER=svc DB_HOST_IP=10.0.0.1 DB_PORT=5432 DB_USERNAME=app \
//!   DB_PASSWORD=hunter22 KEEP_CONNECTION_OPEN=on SERVICE_URL=https://api.local \
//!   cargo run --example service_config
//! ```
//!
//! Set `SPCONF_MANIFEST` to a `spconf.toml` path to resolve a manifest instead.
//! Set `RUST_LOG=spconf=debug` to see fallback attempts as tracing events.

use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use spconf::{BooleanOptions, Manifest, Options, Validator};
use tracing_subscriber::EnvFilter;

const IPV4_ADDRESS: &str = r"/^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$/";

#[derive(Debug)]
#[allow(dead_code)]
struct DatabaseConfig {
    host: Option<String>,
    port: Option<i64>,
    username: Option<String>,
    password: Option<String>,
    keep_connection_open: Option<bool>,
}

#[derive(Debug)]
#[allow(dead_code)]
struct ServiceConfig {
    port: Option<i64>,
    user: Option<String>,
    service_url: Option<String>,
    database: DatabaseConfig,
}

fn read_config() -> Result<ServiceConfig> {
    let ipv4 = Validator::new(IPV4_ADDRESS)?;

    Ok(ServiceConfig {
        port: spconf::read_number("PORT", Options::new().default_value(8080_i64)),
        user: spconf::read_string(["CURRENT_USER", "DEFAULT_USER"], Options::new()),
        service_url: spconf::read_url("SERVICE_URL", Options::new()),
        database: DatabaseConfig {
            host: spconf::read_string("DB_HOST_IP", Options::new().validator(ipv4)),
            port: spconf::read_number("DB_PORT", Options::new()),
            username: spconf::read_string("DB_USERNAME", Options::new()),
            password: spconf::read_password("DB_PASSWORD", Options::new()),
            keep_connection_open: spconf::read_boolean(
                "KEEP_CONNECTION_OPEN",
                BooleanOptions::new(),
            ),
        },
    })
}

fn check_manifest(path: &str) -> Result<()> {
    let manifest =
        Manifest::from_path(path).wrap_err_with(|| format!("Failed to load manifest {path}"))?;
    let config = spconf::resolver().resolve_manifest(&manifest)?;

    println!();
    for name in manifest.vars.keys() {
        match config.get(name) {
            Some(value) => println!("{} {} = {}", "✓".green(), name, value),
            None => println!("{} {} {}", "✗".red(), name, "(required)".red()),
        }
    }
    println!(
        "\nSummary: {} resolved, {} missing",
        config.values.len().to_string().green(),
        config.missing.len().to_string().red()
    );

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match std::env::var("SPCONF_MANIFEST") {
        Ok(path) => check_manifest(&path)?,
        Err(_) => {
            let config = read_config()?;
            if !spconf::missing_env_vars() {
                println!("{config:#?}");
            }
        }
    }

    if spconf::missing_env_vars() {
        eprintln!(
            "{} Some required env vars were missing. Terminating",
            "✗".red()
        );
        std::process::exit(1);
    }

    Ok(())
}
