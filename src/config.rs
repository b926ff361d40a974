use std::env;
use std::fmt;

/// Process configuration, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, value) => write!(f, "{} has an invalid value: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Storage selected by `DATABASE_URL`.
#[derive(Debug, PartialEq)]
pub enum StorageKind {
    Memory,
    MongoDB,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", 10u32)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST", bcrypt_cost.to_string()));
        }

        let token_ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", 3600i64)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid("TOKEN_TTL_SECS", token_ttl_secs.to_string()));
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5000u16)?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_secs,
            bcrypt_cost,
            cors_origins,
        })
    }

    pub fn storage(&self) -> StorageKind {
        if self.database_url.starts_with("memory://") {
            StorageKind::Memory
        } else {
            StorageKind::MongoDB
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "mongodb://localhost:27017/devconnector"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(config.storage(), StorageKind::MongoDB);
    }

    #[test]
    fn test_secret_is_required() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "memory://")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT", "eighty".to_string()));

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "secret"),
            ("BCRYPT_COST", "2"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("BCRYPT_COST", "2".to_string()));
    }

    #[test]
    fn test_memory_storage_and_origins() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "secret"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();
        assert_eq!(config.storage(), StorageKind::Memory);
        assert_eq!(config.cors_origins.len(), 2);
    }
}
