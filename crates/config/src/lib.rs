// crates/config/src/lib.rs

use campus_core::{CampusError, CampusResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub mod loader;
pub mod validator;

pub use loader::ConfigLoader;
pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub external_nlu: ExternalNluConfig,
    pub live: LiveConfig,
    pub knowledge: KnowledgeConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    #[serde(default = "default_classifier_threshold")]
    pub classifier_threshold: f32,
    #[serde(default = "default_true")]
    pub classifier_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            classifier_threshold: default_classifier_threshold(),
            classifier_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalNluConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_external_base_url")]
    pub base_url: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    #[serde(default = "default_process_path")]
    pub process_path: String,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

impl Default for ExternalNluConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_external_base_url(),
            health_path: default_health_path(),
            process_path: default_process_path(),
            probe_timeout_ms: default_probe_timeout_ms(),
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveConfig {
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,
    /// JSON document used to seed the in-memory store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<PathBuf>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            upcoming_days: default_upcoming_days(),
            fixtures: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Overrides the embedded knowledge base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    #[serde(default = "default_session_idle_s")]
    pub session_idle_s: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            session_idle_s: default_session_idle_s(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_max_history() -> usize {
    20
}

const fn default_classifier_threshold() -> f32 {
    0.5
}

const fn default_true() -> bool {
    true
}

fn default_external_base_url() -> String {
    "http://127.0.0.1:5005".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_process_path() -> String {
    "/chat".to_string()
}

const fn default_probe_timeout_ms() -> u64 {
    2000
}

const fn default_call_timeout_ms() -> u64 {
    5000
}

const fn default_query_timeout_ms() -> u64 {
    3000
}

const fn default_upcoming_days() -> u32 {
    7
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_session_idle_s() -> u64 {
    1800
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Holds the active configuration; every change goes through validation.
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    /// Loads `path` (when given), applies `CAMPUS_*` overrides and validates.
    pub fn new(path: Option<&Path>) -> CampusResult<Self> {
        let config = ConfigLoader::load(path)?;
        ConfigValidator::validate(&config)?;

        if let Some(path) = path {
            info!("Configuration loaded from {}", path.display());
        }

        Ok(Self {
            config_path: path.map(Path::to_path_buf),
            config: Arc::new(RwLock::new(config)),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            config_path: None,
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().clone()
    }

    pub fn update<F>(&self, f: F) -> CampusResult<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write();
        let mut candidate = config.clone();
        f(&mut candidate);
        ConfigValidator::validate(&candidate)?;
        *config = candidate;
        Ok(())
    }

    /// Writes the active configuration back to the file it came from.
    pub fn save(&self) -> CampusResult<()> {
        let path = self
            .config_path
            .as_deref()
            .ok_or_else(|| CampusError::Config("No configuration file to save to".to_string()))?;
        ConfigLoader::save_to_file(path, &self.config.read())
    }
}
