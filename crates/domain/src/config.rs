//! Environment-driven configuration for the admin binary.

use std::env;

use thiserror::Error;

/// Default listen address when `ADMIN_BIND_ADDRESS` is not set.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8081";

/// Admin-service configuration (shared database + HTTP bind address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    database_url: String,
    bind_address: String,
}

impl AdminConfig {
    /// Loads configuration by hydrating `.env` (if present) and reading the
    /// process variables. Missing required entries surface as `ConfigError`
    /// so the binary can respond gracefully.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;

        Ok(Self {
            database_url: get_required_var("DATABASE_URL")?,
            bind_address: get_optional_var("ADMIN_BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }
}

fn get_required_var(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ConfigError::MissingVar { key })
            } else {
                Ok(trimmed.to_string())
            }
        }
        Err(_) => Err(ConfigError::MissingVar { key }),
    }
}

fn get_optional_var(key: &'static str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn hydrate_env_file() -> Result<(), ConfigError> {
    if env::var_os("GATEWAY_ADMIN_SKIP_DOTENV").is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(ConfigError::Dotenv { source: err }),
    }

    Ok(())
}

/// Errors emitted when `.env` hydration or environment parsing fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{key}`")]
    MissingVar { key: &'static str },
    #[error("failed to load .env file: {source}")]
    Dotenv {
        #[from]
        source: dotenvy::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    fn set_env() {
        std::env::set_var("GATEWAY_ADMIN_SKIP_DOTENV", "1");
        std::env::set_var("DATABASE_URL", "sqlite://test.db");
        std::env::remove_var("ADMIN_BIND_ADDRESS");
    }

    #[test]
    fn config_loader_reads_env() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("ADMIN_BIND_ADDRESS", "127.0.0.1:9999");

        let config = AdminConfig::load_from_env().expect("config loads");
        assert_eq!(config.database_url(), "sqlite://test.db");
        assert_eq!(config.bind_address(), "127.0.0.1:9999");

        set_env();
    }

    #[test]
    fn bind_address_falls_back_to_default() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();

        let config = AdminConfig::load_from_env().expect("config loads");
        assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn required_env_vars_are_trimmed() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("DATABASE_URL", "  sqlite://trim.db  ");

        let config = AdminConfig::load_from_env().expect("config loads");
        assert_eq!(config.database_url(), "sqlite://trim.db");

        set_env();
    }

    #[test]
    fn empty_required_env_var_is_treated_as_missing() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("DATABASE_URL", "   ");

        let err = AdminConfig::load_from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVar {
                key: "DATABASE_URL"
            }
        ));

        set_env();
    }
}
