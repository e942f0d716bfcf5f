use std::env;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Which implementation of the truck lookup function to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted backend, called over its REST RPC endpoint.
    Rest,
    /// Direct Postgres connection calling the SQL function.
    Postgres,
    /// Fixture data held in process.
    Memory,
}

impl FromStr for BackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(BackendKind::Rest),
            "postgres" => Ok(BackendKind::Postgres),
            "memory" => Ok(BackendKind::Memory),
            other => Err(AppError::Config(format!(
                "SNACKI_BACKEND must be one of rest, postgres, memory (got {})",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub api_url: Option<String>,
    pub anon_key: Option<String>,
    pub database_url: Option<String>,
    pub fixtures_path: Option<String>,
    pub session_token: Option<String>,
    pub default_radius_miles: f64,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let backend = env::var("SNACKI_BACKEND")
            .unwrap_or_else(|_| "rest".to_string())
            .parse()?;

        let config = Self {
            backend,
            api_url: optional("SNACKI_API_URL"),
            anon_key: optional("SNACKI_ANON_KEY"),
            database_url: optional("DATABASE_URL"),
            fixtures_path: optional("SNACKI_FIXTURES"),
            session_token: optional("SNACKI_SESSION_TOKEN"),
            default_radius_miles: parsed("DEFAULT_RADIUS_MILES", 10.0)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parsed("SERVER_PORT", 3000)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks that the settings required by the selected backend are present.
    pub fn validate(&self) -> AppResult<()> {
        match self.backend {
            BackendKind::Rest => {
                if self.api_url.is_none() {
                    return Err(AppError::Config("SNACKI_API_URL must be set".to_string()));
                }
                if self.anon_key.is_none() {
                    return Err(AppError::Config("SNACKI_ANON_KEY must be set".to_string()));
                }
            }
            BackendKind::Postgres => {
                if self.database_url.is_none() {
                    return Err(AppError::Config("DATABASE_URL must be set".to_string()));
                }
            }
            BackendKind::Memory => {}
        }

        if !(self.default_radius_miles.is_finite() && self.default_radius_miles > 0.0) {
            return Err(AppError::Config(
                "DEFAULT_RADIUS_MILES must be a positive number".to_string(),
            ));
        }

        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> Config {
        Config {
            backend: BackendKind::Memory,
            api_url: None,
            anon_key: None,
            database_url: None,
            fixtures_path: None,
            session_token: None,
            default_radius_miles: 10.0,
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
        }
    }

    #[test]
    fn parses_backend_kind() {
        assert_eq!("REST".parse::<BackendKind>().unwrap(), BackendKind::Rest);
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert!("graphql".parse::<BackendKind>().is_err());
    }

    #[test]
    fn rest_backend_requires_credentials() {
        let mut config = memory_config();
        config.backend = BackendKind::Rest;
        config.api_url = Some("https://example.supabase.co".to_string());
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        config.anon_key = Some("anon".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_default_radius() {
        let mut config = memory_config();
        config.default_radius_miles = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn formats_server_addr() {
        assert_eq!(memory_config().server_addr(), "127.0.0.1:3000");
    }
}
