// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

impl OpenAiConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://translation.googleapis.com".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Optional TOML file replacing the built-in rule catalog
    pub rules_path: Option<PathBuf>,
    pub suspicious_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            suspicious_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub address: String,
    pub database_path: PathBuf,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub openai: OpenAiConfig,
    pub translation: TranslationConfig,
    pub cv_service_url: Option<String>,
    pub linkedin_base_url: String,
    pub detector: DetectorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "0.0.0.0".to_string(),
            database_path: PathBuf::from("data/jobboard.db"),
            log_format: LogFormat::Pretty,
            log_file: None,
            jwt_secret: "change-me-in-production".to_string(),
            token_ttl_hours: 24,
            openai: OpenAiConfig::default(),
            translation: TranslationConfig::default(),
            cv_service_url: None,
            linkedin_base_url: "https://www.linkedin.com".to_string(),
            detector: DetectorConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<AppConfig>,
    #[serde(default)]
    production: Option<AppConfig>,
}

impl AppConfig {
    /// Load configuration for the current environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let mut config = Self::load_from_file(Path::new(CONFIG_FILE), &environment)?;
        config.apply_env_overrides();
        config.resolve_paths()?;
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("JOBBOARD_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            warn!(
                "{} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        let selected = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(selected.unwrap_or_default())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(port) = std::env::var("JOBBOARD_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.port = port;
        }
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.openai.model = model;
        }
        if let Ok(key) = std::env::var("GOOGLE_TRANSLATE_API_KEY") {
            self.translation.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("CV_SERVICE_URL") {
            self.cv_service_url = Some(url);
        }
    }

    fn resolve_paths(&mut self) -> Result<()> {
        self.database_path = resolve_path(&self.database_path)?;
        if let Some(log_file) = &self.log_file {
            self.log_file = Some(resolve_path(log_file)?);
        }
        if let Some(rules_path) = &self.detector.rules_path {
            self.detector.rules_path = Some(resolve_path(rules_path)?);
        }
        Ok(())
    }

    /// Ensure the database parent directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
        Ok(())
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  port: 9000
  database_path: data/local.db
  openai:
    model: gpt-4o
  detector:
    suspicious_threshold: 40
production:
  port: 80
  log_format: json
  jwt_secret: prod-secret
"#;

    #[test]
    fn test_selects_local_section_by_default() {
        let config = AppConfig::from_yaml(SAMPLE, "local").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, PathBuf::from("data/local.db"));
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.detector.suspicious_threshold, 40.0);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_selects_production_section() {
        let config = AppConfig::from_yaml(SAMPLE, "production").unwrap();
        assert_eq!(config.port, 80);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.jwt_secret, "prod-secret");
        assert_eq!(config.token_ttl_hours, 24);
    }

    #[test]
    fn test_missing_section_falls_back_to_defaults() {
        let config = AppConfig::from_yaml("local:\n  port: 1234\n", "production").unwrap();
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_openai_enabled_requires_non_empty_key() {
        let mut openai = OpenAiConfig::default();
        assert!(!openai.is_enabled());
        openai.api_key = Some("  ".to_string());
        assert!(!openai.is_enabled());
        openai.api_key = Some("sk-test".to_string());
        assert!(openai.is_enabled());
    }
}
