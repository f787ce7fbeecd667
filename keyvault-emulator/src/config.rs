//! Configuration management

use keyvault_secrets::SeedSecret;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Secrets loaded into the store at start-up
    #[serde(default)]
    pub secrets: Vec<SeedSecret>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            secrets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `keyvault-emulator.{toml,json,yaml}` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("keyvault-emulator").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("KEYVAULT_EMULATOR"))
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert!(config.secrets.is_empty());
    }

    #[test]
    fn test_parse_seed_secrets() {
        let config: Config = toml::from_str(
            r#"
log_level = "debug"

[[secrets]]
name = "db-password"
value = "hunter2"
content_type = "text/plain"
tags = { team = "core" }

[[secrets]]
name = "api-key"
value = "abc123"
"#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.secrets.len(), 2);
        assert_eq!(config.secrets[0].content_type.as_deref(), Some("text/plain"));
        assert_eq!(config.secrets[0].tags["team"], "core");
        assert!(config.secrets[1].tags.is_empty());
    }
}
