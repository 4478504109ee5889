use crate::domain::{FighterColor, Seconds, ALLOWED_ROUND_SECS};
use crate::operator::PromptDefaults;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreBackend,
    pub database_path: Option<String>,
    pub default_round_secs: u32,
    pub referee_fallback_color: FighterColor,
    pub store_retry_max_elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let store = match env_map.get("STORE").map(|s| s.as_str()).unwrap_or("sqlite") {
            "sqlite" => StoreBackend::Sqlite,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORE".to_string(),
                    format!("must be sqlite or memory, got {}", other),
                ))
            }
        };

        let database_path = env_map.get("DATABASE_PATH").cloned();
        if store == StoreBackend::Sqlite && database_path.is_none() {
            return Err(ConfigError::MissingEnv("DATABASE_PATH".to_string()));
        }

        let default_round_secs = env_map
            .get("DEFAULT_ROUND_SECS")
            .map(|s| s.as_str())
            .unwrap_or("120")
            .parse::<u32>()
            .ok()
            .filter(|secs| ALLOWED_ROUND_SECS.contains(secs))
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "DEFAULT_ROUND_SECS".to_string(),
                    "must be 60, 90 or 120".to_string(),
                )
            })?;

        let referee_fallback_color = FighterColor::from_str(
            env_map
                .get("REFEREE_FALLBACK_COLOR")
                .map(|s| s.as_str())
                .unwrap_or("blue"),
        )
        .map_err(|e| ConfigError::InvalidValue("REFEREE_FALLBACK_COLOR".to_string(), e.to_string()))?;

        let store_retry_max_elapsed_ms = env_map
            .get("STORE_RETRY_MAX_ELAPSED_MS")
            .map(|s| s.as_str())
            .unwrap_or("2000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "STORE_RETRY_MAX_ELAPSED_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        Ok(Config {
            port,
            store,
            database_path,
            default_round_secs,
            referee_fallback_color,
            store_retry_max_elapsed_ms,
        })
    }

    /// Values used when an operator dismisses a prompt.
    pub fn prompt_defaults(&self) -> PromptDefaults {
        PromptDefaults {
            round_secs: self.default_round_secs,
            pause: Seconds::ZERO,
            referee_winner: self.referee_fallback_color,
        }
    }

    pub fn store_retry_max_elapsed(&self) -> Duration {
        Duration::from_millis(self.store_retry_max_elapsed_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            store: StoreBackend::Memory,
            database_path: None,
            default_round_secs: 120,
            referee_fallback_color: FighterColor::Blue,
            store_retry_max_elapsed_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/scores.db".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.default_round_secs, 120);
        assert_eq!(config.referee_fallback_color, FighterColor::Blue);
        assert_eq!(config.prompt_defaults().pause, Seconds::ZERO);
    }

    #[test]
    fn test_missing_database_path() {
        let result = Config::from_env_map(HashMap::new());
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_memory_store_needs_no_path() {
        let mut env_map = HashMap::new();
        env_map.insert("STORE".to_string(), "memory".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_round_secs() {
        let mut env_map = setup_required_env();
        env_map.insert("DEFAULT_ROUND_SECS".to_string(), "100".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DEFAULT_ROUND_SECS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_referee_fallback_color() {
        let mut env_map = setup_required_env();
        env_map.insert("REFEREE_FALLBACK_COLOR".to_string(), "red".to_string());
        let config = Config::from_env_map(env_map.clone()).unwrap();
        assert_eq!(config.prompt_defaults().referee_winner, FighterColor::Red);

        env_map.insert("REFEREE_FALLBACK_COLOR".to_string(), "green".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "REFEREE_FALLBACK_COLOR"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_store() {
        let mut env_map = setup_required_env();
        env_map.insert("STORE".to_string(), "redis".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "STORE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
