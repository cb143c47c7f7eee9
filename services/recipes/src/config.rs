//! Server settings loaded through the `config` crate
//!
//! Every key can be overridden with a `RECIPES__<KEY>` environment variable,
//! e.g. `RECIPES__BIND_ADDRESS=127.0.0.1:8080`.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::permissions::UserWritePolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Directory holding uploaded avatars, recipe images and recipe files
    pub media_root: PathBuf,
    /// Let any caller update or delete any user account
    pub open_user_writes: bool,
    /// Lifetime of a login session
    pub session_ttl_seconds: u64,
}

impl ServerConfig {
    /// Load the configuration from `RECIPES__*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("RECIPES"))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:8000")?
            .set_default("media_root", "media")?
            .set_default("open_user_writes", false)?
            .set_default("session_ttl_seconds", 1_209_600_i64)? // 2 weeks
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn user_write_policy(&self) -> UserWritePolicy {
        if self.open_user_writes {
            UserWritePolicy::Open
        } else {
            UserWritePolicy::SelfOnly
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            media_root: PathBuf::from("media"),
            open_user_writes: false,
            session_ttl_seconds: 1_209_600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("RECIPES").source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_environment(environment(&[])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.media_root, PathBuf::from("media"));
        assert!(!config.open_user_writes);
        assert_eq!(config.session_ttl_seconds, 1_209_600);
        assert_eq!(config.user_write_policy(), UserWritePolicy::SelfOnly);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ServerConfig::from_environment(environment(&[
            ("RECIPES__BIND_ADDRESS", "127.0.0.1:9000"),
            ("RECIPES__MEDIA_ROOT", "/srv/media"),
            ("RECIPES__OPEN_USER_WRITES", "true"),
            ("RECIPES__SESSION_TTL_SECONDS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.media_root, PathBuf::from("/srv/media"));
        assert_eq!(config.user_write_policy(), UserWritePolicy::Open);
        assert_eq!(config.session_ttl_seconds, 60);
    }
}
