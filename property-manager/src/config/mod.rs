//! Configuration and dependency initialization.
//!
//! Settings come from environment variables (a `.env` file is loaded first by
//! the binary). Every variable has a default except `DATABASE_URL`, which the
//! PostgreSQL backend requires.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use property_manager_repository::ServiceConfig;
use tracing::warn;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_MEDIA_ROOT: &str = "./media";
const DEFAULT_LOGIN_URL: &str = "/accounts/login/";

/// Which record store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Non-persistent store; handy for demos and local development.
    Memory,
}

/// Runtime settings for the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub media_root: PathBuf,
    pub login_url: String,
    pub service: ServiceConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Postgres,
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
            server_host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            server_port: DEFAULT_SERVER_PORT,
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            service: ServiceConfig::default(),
        }
    }
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
    /// - `RUN_MIGRATIONS`: apply embedded migrations on start (default: true)
    /// - `SERVER_HOST` / `SERVER_PORT`: bind address (default: 127.0.0.1:8080)
    /// - `MEDIA_ROOT`: uploaded documents directory (default: ./media)
    /// - `LOGIN_URL`: where unauthenticated callers are sent (default: /accounts/login/)
    /// - `UNIT_PAGE_SIZE`, `PAYMENT_PAGE_SIZE`, `RECORD_PAGE_SIZE`: list page sizes
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the settings through `lookup`. Invalid values fall back to the
    /// default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store_backend = match value("STORE_BACKEND").map(|v| v.to_lowercase()).as_deref() {
            None | Some("postgres") | Some("postgresql") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                warn!(value = %other, "Invalid STORE_BACKEND, defaulting to 'postgres'");
                StoreBackend::Postgres
            }
        };

        let run_migrations = match value("RUN_MIGRATIONS").map(|v| v.to_lowercase()).as_deref() {
            None => defaults.run_migrations,
            Some("true") | Some("1") | Some("yes") => true,
            Some("false") | Some("0") | Some("no") => false,
            Some(other) => {
                warn!(value = %other, "Invalid RUN_MIGRATIONS, defaulting to 'true'");
                defaults.run_migrations
            }
        };

        let service = ServiceConfig {
            unit_page_size: page_size(&value, "UNIT_PAGE_SIZE", defaults.service.unit_page_size),
            payment_page_size: page_size(
                &value,
                "PAYMENT_PAGE_SIZE",
                defaults.service.payment_page_size,
            ),
            record_page_size: page_size(
                &value,
                "RECORD_PAGE_SIZE",
                defaults.service.record_page_size,
            ),
        };

        Settings {
            store_backend,
            database_url: value("DATABASE_URL"),
            database_max_connections: parsed(
                &value,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            run_migrations,
            server_host: parsed(&value, "SERVER_HOST", defaults.server_host),
            server_port: parsed(&value, "SERVER_PORT", defaults.server_port),
            media_root: value("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            login_url: value("LOGIN_URL").unwrap_or(defaults.login_url),
            service,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}

fn parsed<T, V>(value: &V, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match value(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key = %key, value = %raw, default = %default, "Invalid setting, using default");
            default
        }),
    }
}

fn page_size<V>(value: &V, key: &str, default: u64) -> u64
where
    V: Fn(&str) -> Option<String>,
{
    let size = parsed(value, key, default);
    if size == 0 {
        warn!(key = %key, default = default, "Page size must be positive, using default");
        return default;
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.addr().to_string(), "127.0.0.1:8080");
        assert_eq!(settings.service.unit_page_size, 15);
        assert_eq!(settings.service.payment_page_size, 20);
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("STORE_BACKEND", "Memory"),
            ("DATABASE_URL", "postgres://localhost/pm"),
            ("RUN_MIGRATIONS", "false"),
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9000"),
            ("MEDIA_ROOT", "/var/lib/pm"),
            ("LOGIN_URL", "/login"),
            ("UNIT_PAGE_SIZE", "30"),
        ]);
        assert_eq!(settings.store_backend, StoreBackend::Memory);
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/pm"));
        assert!(!settings.run_migrations);
        assert_eq!(settings.addr().to_string(), "0.0.0.0:9000");
        assert_eq!(settings.media_root, PathBuf::from("/var/lib/pm"));
        assert_eq!(settings.login_url, "/login");
        assert_eq!(settings.service.unit_page_size, 30);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let settings = settings(&[
            ("STORE_BACKEND", "sqlite"),
            ("SERVER_PORT", "http"),
            ("DATABASE_MAX_CONNECTIONS", "-3"),
            ("PAYMENT_PAGE_SIZE", "0"),
            ("RECORD_PAGE_SIZE", "many"),
            ("RUN_MIGRATIONS", "maybe"),
        ]);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("SERVER_PORT", "8181");
        let settings = Settings::from_env();
        env::remove_var("STORE_BACKEND");
        env::remove_var("SERVER_PORT");
        assert_eq!(settings.store_backend, StoreBackend::Memory);
        assert_eq!(settings.server_port, 8181);
    }
}
