use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for the workflow engine
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Workflow definition files to register at startup
    #[serde(default)]
    pub definitions: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            observability: ObservabilityConfig::default(),
            definitions: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. workflow-engine.toml in the working directory
    /// 3. Environment variables (prefixed with WORKFLOW_ENGINE_)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("workflow-engine.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let defaults = EngineConfig::default();
        let mut builder = Config::builder()
            .set_default("observability.log_level", defaults.observability.log_level)?
            .set_default("observability.json_logs", defaults.observability.json_logs)?
            .set_default("definitions", Vec::<String>::new())?;

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("WORKFLOW_ENGINE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("definitions"),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs);
        assert!(config.definitions.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow-engine.toml");

        let config = EngineConfig {
            observability: ObservabilityConfig {
                log_level: "debug".to_string(),
                json_logs: true,
            },
            definitions: vec![PathBuf::from("workflows/security.toml")],
        };
        config.save_to_file(&path).unwrap();

        let reloaded = EngineConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.observability.log_level, "debug");
        assert!(reloaded.observability.json_logs);
        assert_eq!(reloaded.definitions, vec![PathBuf::from("workflows/security.toml")]);
    }
}
