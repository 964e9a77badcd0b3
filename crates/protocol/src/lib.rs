//! # ck-protocol
//!
//! Core protocol definitions and data models for content-kit.
//!
//! This crate defines all shared data structures used for:
//! - Configuration file parsing (YAML pipelines, TOML config)
//! - Content records and their subtype payloads
//! - Runtime run state and the per-run context
//! - The standardized task result envelope
//! - Scored keywords
//! - Engine progress events
//!
//! ## Modules
//!
//! - [`config_models`]: Global configuration from config.toml
//! - [`content_models`]: Content records and subtype payloads
//! - [`events`]: Engine progress events
//! - [`keyword_models`]: Scored keywords
//! - [`pipeline_models`]: Pipeline, data-flow, and branching tables
//! - [`run_models`]: Runtime run state and run context
//! - [`task_models`]: Task result envelope and metadata
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, serde_json, uuid, and chrono
//! - Independent compilation: no dependencies on other content-kit crates

pub mod config_models;
pub mod content_models;
pub mod events;
pub mod keyword_models;
pub mod pipeline_models;
pub mod run_models;
pub mod task_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use content_models::*;
pub use events::*;
pub use keyword_models::*;
pub use pipeline_models::*;
pub use run_models::*;
pub use task_models::*;
