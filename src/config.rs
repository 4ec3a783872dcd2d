//! Environment-driven settings, read once before the server binds.
//!
//! Storage is PostgreSQL when `DATABASE_URL` is set, or when `DB_NAME` is set
//! together with `DB_USER`/`DB_PASSWORD` (`DB_HOST` and `DB_PORT` default to
//! `localhost:5432`). Otherwise everything lives in memory and is gone on
//! restart.
//!
//! | Variable | Default |
//! |---|---|
//! | `VISITOR_HASH_SECRET` | required |
//! | `LISTEN` | `0.0.0.0:3000` |
//! | `RUST_LOG` | `info` |
//! | `LOG_FORMAT` | `text` (`json` for structured output) |
//! | `PUBLIC_BASE_URL` | `http://localhost:3000` |
//! | `ANALYTICS_PRECOMPUTED` | `true` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_CONNECT_TIMEOUT` | `30` seconds |

use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;

const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Runtime settings for the server and the admin tooling.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Scheme and host that short codes are appended to, without trailing slash.
    pub public_base_url: String,
    pub visitor_hash_secret: String,
    /// When false, metrics always aggregate raw events.
    pub analytics_precomputed: bool,
    pub db_max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub db_connect_timeout: u64,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_or(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => !(raw.eq_ignore_ascii_case("false") || raw.trim() == "0"),
        Err(_) => default,
    }
}

impl Config {
    /// Reads every setting from the process environment.
    ///
    /// Fails when `VISITOR_HASH_SECRET` is absent or when `DB_NAME` is given
    /// without credentials.
    pub fn from_env() -> Result<Self> {
        let database_url =
            Self::load_database_url().context("Invalid database settings")?;
        let visitor_hash_secret =
            env::var("VISITOR_HASH_SECRET").context("VISITOR_HASH_SECRET is required")?;

        Ok(Self {
            database_url,
            listen_addr: var_or("LISTEN", DEFAULT_LISTEN),
            log_level: var_or("RUST_LOG", "info"),
            log_format: var_or("LOG_FORMAT", "text"),
            public_base_url: var_or("PUBLIC_BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            visitor_hash_secret,
            analytics_precomputed: flag_or("ANALYTICS_PRECOMPUTED", true),
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10),
            db_connect_timeout: parsed_or("DB_CONNECT_TIMEOUT", 30),
        })
    }

    /// `DATABASE_URL` wins; otherwise the URL is assembled from the `DB_*`
    /// parts. No `DB_NAME` means no database.
    pub fn load_database_url() -> Result<Option<String>> {
        if let Ok(url) = env::var("DATABASE_URL") {
            return Ok(Some(url));
        }

        let Ok(name) = env::var("DB_NAME") else {
            return Ok(None);
        };

        let user = env::var("DB_USER").context("DB_NAME is set but DB_USER is missing")?;
        let password =
            env::var("DB_PASSWORD").context("DB_NAME is set but DB_PASSWORD is missing")?;
        let host = var_or("DB_HOST", "localhost");
        let port = var_or("DB_PORT", "5432");

        Ok(Some(format!("postgres://{user}:{password}@{host}:{port}/{name}")))
    }

    /// Rejects settings the server could not start with.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.log_format.as_str(), "text" | "json") {
            bail!("unsupported LOG_FORMAT '{}' (text|json)", self.log_format);
        }

        if !self.listen_addr.contains(':') {
            bail!("LISTEN needs host:port, got '{}'", self.listen_addr);
        }

        if let Some(url) = &self.database_url
            && !(url.starts_with("postgres://") || url.starts_with("postgresql://"))
        {
            bail!(
                "DATABASE_URL is not a PostgreSQL URL: '{}'",
                mask_connection_string(url)
            );
        }

        if !(self.public_base_url.starts_with("http://")
            || self.public_base_url.starts_with("https://"))
        {
            bail!(
                "PUBLIC_BASE_URL needs an http(s) scheme, got '{}'",
                self.public_base_url
            );
        }

        if self.visitor_hash_secret.is_empty() {
            bail!("VISITOR_HASH_SECRET is empty");
        }

        if self.db_max_connections == 0 || self.db_connect_timeout == 0 {
            bail!("DB_MAX_CONNECTIONS and DB_CONNECT_TIMEOUT must be positive");
        }

        Ok(())
    }

    pub fn is_database_enabled(&self) -> bool {
        self.database_url.is_some()
    }

    /// Logs the effective settings with credentials masked.
    pub fn print_summary(&self) {
        let storage = self
            .database_url
            .as_deref()
            .map(mask_connection_string)
            .unwrap_or_else(|| "in-memory".to_string());

        tracing::info!(
            listen = %self.listen_addr,
            storage = %storage,
            base_url = %self.public_base_url,
            precomputed = self.analytics_precomputed,
            log_level = %self.log_level,
            log_format = %self.log_format,
            "configuration loaded"
        );
    }
}

/// Hides the password of a connection URL, e.g.
/// `postgres://app:hunter2@db/links` becomes `postgres://app:***@db/links`.
///
/// Input that does not parse as a URL is returned unchanged.
pub fn mask_connection_string(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("***")).is_err() {
                return raw.to_string();
            }
            parsed.to_string()
        }
        _ => raw.to_string(),
    }
}

/// [`Config::from_env`] followed by [`Config::validate`].
///
/// `.env` files must already be applied to the environment.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
