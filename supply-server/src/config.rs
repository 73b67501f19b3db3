//! Service configuration
//!
//! | variable                      | default     |
//! |-------------------------------|-------------|
//! | `DATABASE_URL`                | unset (memory mode) |
//! | `PERSISTENCE`                 | `relational` when `DATABASE_URL` is set, else `memory` |
//! | `HTTP_PORT`                   | 8080        |
//! | `ENVIRONMENT`                 | development |
//! | `STORE_TIMEOUT_MS`            | 5000        |
//! | `DB_MAX_CONNECTIONS`          | 10          |
//! | `NOTIFICATION_LIST_LIMIT`     | 50          |
//! | `NOTIFICATION_CACHE_CAPACITY` | 100         |
//! | `ORDER_NUMBER_MAX_ATTEMPTS`   | 3           |
//! | `ROUTE_STEPS`                 | 20          |
//! | `FLEET_EXCLUSIVE_DISPATCH`    | false       |
//! | `AUTH_JWT_SECRET`             | unset       |
//! | `FORECAST_SERVICE_URL`        | unset       |
//! | `FORECAST_TIMEOUT_MS`         | 10000       |
//! | `LOG_FORMAT` / `LOG_DIR`      | text / unset |

use std::str::FromStr;
use std::time::Duration;

use crate::BoxError;

/// Which store adapter backs the service. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Relational,
    Memory,
}

impl Persistence {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Relational => "relational",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for Persistence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relational" | "postgres" => Ok(Self::Relational),
            "memory" | "demo" => Ok(Self::Memory),
            other => Err(format!("unknown PERSISTENCE value: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: Option<String>,
    pub persistence: Persistence,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Upper bound for every store call
    pub store_timeout: Duration,
    pub db_max_connections: u32,
    pub notification_list_limit: usize,
    pub notification_cache_capacity: usize,
    pub order_number_max_attempts: u32,
    pub route_steps: u32,
    /// Mark dispatched vehicles `in_use` and release them on delivery
    pub fleet_exclusive_dispatch: bool,
    /// HS256 secret; when set, bearer tokens are required
    pub auth_jwt_secret: Option<String>,
    pub forecast_service_url: Option<String>,
    pub forecast_timeout: Duration,
    /// `json` switches log output to JSON lines
    pub log_format: String,
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            persistence: Persistence::Memory,
            http_port: 8080,
            environment: "development".into(),
            store_timeout: Duration::from_millis(5000),
            db_max_connections: 10,
            notification_list_limit: 50,
            notification_cache_capacity: 100,
            order_number_max_attempts: 3,
            route_steps: 20,
            fleet_exclusive_dispatch: false,
            auth_jwt_secret: None,
            forecast_service_url: None,
            forecast_timeout: Duration::from_millis(10_000),
            log_format: "text".into(),
            log_dir: None,
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    env_opt(name).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_flag(name: &str) -> bool {
    env_opt(name)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();
        let database_url = env_opt("DATABASE_URL");

        let persistence = match env_opt("PERSISTENCE") {
            Some(raw) => raw.parse::<Persistence>()?,
            None if database_url.is_some() => Persistence::Relational,
            None => Persistence::Memory,
        };
        if persistence == Persistence::Relational && database_url.is_none() {
            return Err("PERSISTENCE=relational requires DATABASE_URL".into());
        }

        Ok(Self {
            database_url,
            persistence,
            http_port: env_parse("HTTP_PORT", defaults.http_port),
            environment: env_opt("ENVIRONMENT").unwrap_or(defaults.environment),
            store_timeout: Duration::from_millis(env_parse("STORE_TIMEOUT_MS", 5000)),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            notification_list_limit: env_parse(
                "NOTIFICATION_LIST_LIMIT",
                defaults.notification_list_limit,
            ),
            notification_cache_capacity: env_parse(
                "NOTIFICATION_CACHE_CAPACITY",
                defaults.notification_cache_capacity,
            ),
            order_number_max_attempts: env_parse(
                "ORDER_NUMBER_MAX_ATTEMPTS",
                defaults.order_number_max_attempts,
            )
            .max(1),
            route_steps: env_parse("ROUTE_STEPS", defaults.route_steps),
            fleet_exclusive_dispatch: env_flag("FLEET_EXCLUSIVE_DISPATCH"),
            auth_jwt_secret: env_opt("AUTH_JWT_SECRET"),
            forecast_service_url: env_opt("FORECAST_SERVICE_URL"),
            forecast_timeout: Duration::from_millis(env_parse("FORECAST_TIMEOUT_MS", 10_000)),
            log_format: env_opt("LOG_FORMAT").unwrap_or(defaults.log_format),
            log_dir: env_opt("LOG_DIR"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
