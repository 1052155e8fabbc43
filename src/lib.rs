pub mod app;

pub use app::CampusApp;
pub use campus_config::{AppConfig, ConfigManager};
pub use campus_engine::{Engine, EngineConfig, EngineEvent, Outcome, Reply};
