// crates/config/src/loader.rs

use campus_core::{CampusError, CampusResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::AppConfig;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_from_file(path: &Path) -> CampusResult<AppConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CampusError::Config(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| CampusError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn save_to_file(path: &Path, config: &AppConfig) -> CampusResult<()> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| CampusError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CampusError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// File (or defaults) first, then `CAMPUS_*` environment variables on top.
    pub fn load(path: Option<&Path>) -> CampusResult<AppConfig> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => AppConfig::default(),
        };
        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    pub fn apply_env_overrides(config: &mut AppConfig) -> CampusResult<()> {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    pub fn apply_overrides_from<F>(config: &mut AppConfig, lookup: F) -> CampusResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CAMPUS_MAX_HISTORY") {
            config.engine.max_history = parse("CAMPUS_MAX_HISTORY", &value)?;
        }
        if let Some(value) = lookup("CAMPUS_CLASSIFIER_THRESHOLD") {
            config.engine.classifier_threshold = parse("CAMPUS_CLASSIFIER_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("CAMPUS_CLASSIFIER_ENABLED") {
            config.engine.classifier_enabled = parse_flag("CAMPUS_CLASSIFIER_ENABLED", &value)?;
        }
        if let Some(value) = lookup("CAMPUS_EXTERNAL_NLU_ENABLED") {
            config.external_nlu.enabled = parse_flag("CAMPUS_EXTERNAL_NLU_ENABLED", &value)?;
        }
        if let Some(value) = lookup("CAMPUS_EXTERNAL_NLU_URL") {
            config.external_nlu.base_url = value;
        }
        if let Some(value) = lookup("CAMPUS_LIVE_QUERY_TIMEOUT_MS") {
            config.live.query_timeout_ms = parse("CAMPUS_LIVE_QUERY_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("CAMPUS_LIVE_FIXTURES") {
            config.live.fixtures = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("CAMPUS_KNOWLEDGE_PATH") {
            config.knowledge.path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("CAMPUS_API_HOST") {
            config.api.host = value;
        }
        if let Some(value) = lookup("CAMPUS_API_PORT") {
            config.api.port = parse("CAMPUS_API_PORT", &value)?;
        }
        if let Some(value) = lookup("CAMPUS_LOG_LEVEL") {
            config.logging.level = value;
        }

        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> CampusResult<T> {
    debug!("Overriding configuration from {}", key);
    value
        .trim()
        .parse()
        .map_err(|_| CampusError::Config(format!("Invalid value for {}: '{}'", key, value)))
}

fn parse_flag(key: &str, value: &str) -> CampusResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CampusError::Config(format!(
            "Invalid value for {}: '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = AppConfig::default();
        ConfigLoader::apply_overrides_from(
            &mut config,
            lookup(&[
                ("CAMPUS_API_PORT", "8088"),
                ("CAMPUS_EXTERNAL_NLU_ENABLED", "yes"),
                ("CAMPUS_EXTERNAL_NLU_URL", "http://nlu.internal:5005"),
                ("CAMPUS_CLASSIFIER_THRESHOLD", "0.7"),
                ("CAMPUS_KNOWLEDGE_PATH", "/srv/kb.yaml"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api.port, 8088);
        assert!(config.external_nlu.enabled);
        assert_eq!(config.external_nlu.base_url, "http://nlu.internal:5005");
        assert_eq!(config.engine.classifier_threshold, 0.7);
        assert_eq!(config.knowledge.path, Some(PathBuf::from("/srv/kb.yaml")));
        assert_eq!(config.engine.max_history, 20);
    }

    #[test]
    fn malformed_overrides_are_config_errors() {
        let mut config = AppConfig::default();
        let err = ConfigLoader::apply_overrides_from(
            &mut config,
            lookup(&[("CAMPUS_API_PORT", "eighty")]),
        )
        .unwrap_err();
        assert!(matches!(err, CampusError::Config(_)));

        let err = ConfigLoader::apply_overrides_from(
            &mut config,
            lookup(&[("CAMPUS_CLASSIFIER_ENABLED", "maybe")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("CAMPUS_CLASSIFIER_ENABLED"));
    }

    #[test]
    fn save_and_load_preserve_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("campus.toml");

        let mut config = AppConfig::default();
        config.live.fixtures = Some(PathBuf::from("fixtures/live.json"));
        config.api.cors_enabled = false;
        ConfigLoader::save_to_file(&path, &config).unwrap();

        assert_eq!(ConfigLoader::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn unreadable_files_are_config_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            ConfigLoader::load_from_file(&missing),
            Err(CampusError::Config(_))
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[engine\nmax_history = ").unwrap();
        assert!(matches!(
            ConfigLoader::load_from_file(&broken),
            Err(CampusError::Config(_))
        ));
    }
}
