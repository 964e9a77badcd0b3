//! Configuration loading, validation, and the assembled pipeline definition.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_config;
pub use models::{AppConfig, PipelineDefinition};
