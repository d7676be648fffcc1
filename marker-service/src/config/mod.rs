use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MarkerConfig {
    pub common: core_config::Config,
    pub store: StoreBackend,
    pub mongodb: MongoConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
    pub rate_limit_per_second: u32,
    pub hsts_max_age: u64,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            rate_limit_per_second: 20,
            hsts_max_age: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl MarkerConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let store: StoreBackend = get_env("STORE_BACKEND", Some("mongo"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // The connection string only matters when MongoDB backs the store
        let uri_default = match store {
            StoreBackend::Mongo => None,
            StoreBackend::Memory => Some(""),
        };

        let defaults = HttpConfig::default();

        Ok(MarkerConfig {
            common,
            store,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_CONN_STRING", uri_default, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("images-on-map"), is_prod)?,
                collection: get_env("MONGODB_COLLECTION", Some("markers"), is_prod)?,
            },
            http: HttpConfig {
                request_timeout_secs: get_parsed(
                    "REQUEST_TIMEOUT_SECS",
                    defaults.request_timeout_secs,
                )?,
                rate_limit_per_second: get_parsed(
                    "RATE_LIMIT_PER_SECOND",
                    defaults.rate_limit_per_second,
                )?,
                hsts_max_age: get_parsed("HSTS_MAX_AGE", defaults.hsts_max_age)?,
            },
        })
    }

    /// In-memory configuration used by tests and local experiments.
    pub fn in_memory() -> Self {
        MarkerConfig {
            common: core_config::Config::default(),
            store: StoreBackend::Memory,
            mongodb: MongoConfig {
                uri: String::new(),
                database: "images-on-map".to_string(),
                collection: "markers".to_string(),
            },
            http: HttpConfig::default(),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod && default.map_or(true, str::is_empty) {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn get_parsed<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, val, e))
        }),
        Err(_) => Ok(default),
    }
}
