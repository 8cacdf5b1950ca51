/*
 * Responsibility
 * - load settings from the environment (.env via dotenvy, then process env)
 * - validate them; anything missing or inconsistent fails startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Which record provider backs the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStore {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory {
        seed_file: Option<PathBuf>,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub user_store: UserStore,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (process env in `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let user_store = match lookup("USER_STORE")
            .unwrap_or_else(|| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => {
                let database_url =
                    lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
                let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                    Some(v) => v
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?,
                    None => 5,
                };
                UserStore::Postgres {
                    database_url,
                    max_connections,
                }
            }
            // The memory store is a development convenience only.
            "memory" if app_env.is_production() => {
                return Err(ConfigError::Invalid("USER_STORE"));
            }
            "memory" => UserStore::Memory {
                seed_file: lookup("USER_SEED_FILE")
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
            },
            _ => return Err(ConfigError::Invalid("USER_STORE")),
        };

        let request_timeout_seconds = lookup("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(10);

        Ok(Self {
            addr,
            app_env,
            user_store,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}
