// crates/config/src/validator.rs

use campus_core::{CampusError, CampusResult};
use tracing::warn;

use crate::AppConfig;

const MAX_UPCOMING_DAYS: u32 = 365;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> CampusResult<()> {
        // Engine
        if config.engine.max_history == 0 {
            return Err(CampusError::Config("max_history must be > 0".to_string()));
        }
        let threshold = config.engine.classifier_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CampusError::Config(
                "Classifier threshold must be 0.0-1.0".to_string(),
            ));
        }

        // External NLU
        let external = &config.external_nlu;
        if external.enabled && external.base_url.trim().is_empty() {
            return Err(CampusError::Config(
                "External NLU is enabled but has no base_url".to_string(),
            ));
        }
        if external.probe_timeout_ms == 0 || external.call_timeout_ms == 0 {
            return Err(CampusError::Config(
                "External NLU timeouts must be > 0".to_string(),
            ));
        }

        // Live data
        if config.live.query_timeout_ms == 0 {
            return Err(CampusError::Config(
                "Live query timeout must be > 0".to_string(),
            ));
        }
        if !(1..=MAX_UPCOMING_DAYS).contains(&config.live.upcoming_days) {
            return Err(CampusError::Config(format!(
                "upcoming_days must be 1-{}",
                MAX_UPCOMING_DAYS
            )));
        }
        if let Some(fixtures) = &config.live.fixtures {
            if !fixtures.exists() {
                warn!("Live fixtures file does not exist: {:?}", fixtures);
            }
        }

        // Knowledge
        if let Some(path) = &config.knowledge.path {
            if !path.exists() {
                warn!("Knowledge base path does not exist: {:?}", path);
            }
        }

        // API
        if config.api.port == 0 {
            return Err(CampusError::Config("Invalid API port".to_string()));
        }
        if config.api.session_idle_s == 0 {
            warn!("Session idle limit is 0; sessions will be reaped on every sweep");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rejected(mutate: impl FnOnce(&mut AppConfig)) -> bool {
        let mut config = AppConfig::default();
        mutate(&mut config);
        matches!(ConfigValidator::validate(&config), Err(CampusError::Config(_)))
    }

    #[test]
    fn threshold_must_be_a_probability() {
        assert!(rejected(|c| c.engine.classifier_threshold = -0.1));
        assert!(rejected(|c| c.engine.classifier_threshold = 1.01));
        assert!(!rejected(|c| c.engine.classifier_threshold = 1.0));
        assert!(!rejected(|c| c.engine.classifier_threshold = 0.0));
    }

    #[test]
    fn zero_sizes_and_timeouts_are_rejected() {
        assert!(rejected(|c| c.engine.max_history = 0));
        assert!(rejected(|c| c.api.port = 0));
        assert!(rejected(|c| c.external_nlu.probe_timeout_ms = 0));
        assert!(rejected(|c| c.external_nlu.call_timeout_ms = 0));
        assert!(rejected(|c| c.live.query_timeout_ms = 0));
        assert!(rejected(|c| c.live.upcoming_days = 0));
    }

    #[test]
    fn upcoming_window_is_at_most_a_year() {
        assert!(!rejected(|c| c.live.upcoming_days = 365));
        assert!(rejected(|c| c.live.upcoming_days = 366));
        assert!(rejected(|c| c.live.upcoming_days = u32::MAX));
    }

    #[test]
    fn enabled_external_service_needs_a_url() {
        assert!(rejected(|c| {
            c.external_nlu.enabled = true;
            c.external_nlu.base_url = "  ".to_string();
        }));
        assert!(!rejected(|c| c.external_nlu.base_url.clear()));
    }

    #[test]
    fn missing_paths_only_warn() {
        assert!(!rejected(|c| {
            c.knowledge.path = Some(PathBuf::from("/definitely/not/here.yaml"));
            c.live.fixtures = Some(PathBuf::from("/definitely/not/here.json"));
        }));
    }
}
