//! Plugin task contract, registry, and built-in tasks.
//!
//! - [`base`]: the [`PluginTask`] trait and [`TaskError`]
//! - [`harness`]: the standardized-result execution wrapper
//! - [`registry`]: the explicit step-name -> task table
//! - [`builtin`]: the built-in content tasks
//! - [`util`]: shared content checks

pub mod base;
pub mod builtin;
pub mod harness;
pub mod registry;
pub mod util;

pub use base::{PluginTask, TaskError};
pub use harness::run_task;
pub use registry::TaskRegistry;
