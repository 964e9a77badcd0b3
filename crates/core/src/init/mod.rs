//! Scaffolding for new `.content-kit/` directories.

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_structure, InitOptions};
