//! Configuration file loader for the `.content-kit/` directory structure.
//!
//! This module loads and parses all configuration files from the
//! `.content-kit/` directory, including:
//! - `config.toml`: global engine and scoring settings
//! - `pipelines/*.yaml`: pipeline definitions
//! - `flow.yaml`: the context-passing table
//! - `branching.yaml`: sub-pipelines and the subtype branching table
//!
//! Loading is all-or-nothing: the assembled definition is validated against
//! the task registry before it is returned, and the first unresolvable step
//! or malformed rule aborts the load.

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::{AppConfig, PipelineDefinition};
use crate::tasks::registry::TaskRegistry;
use ck_protocol::config_models::GlobalConfig;
use ck_protocol::pipeline_models::{BranchingTable, FlowTable, PipelineSpec};
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

/// Loads and validates all configuration from the `.content-kit/` directory.
///
/// If the directory does not exist, an empty default configuration is
/// returned rather than an error. Loading the same directory twice yields
/// structurally equal configurations.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML or YAML)
/// - Scoring weights do not sum to 1.0
/// - The assembled definition fails validation against `registry`
///   (unresolvable step, unknown sub-pipeline, duplicate output key)
///
/// # Example
///
/// ```rust,no_run
/// use ck_core::config::loader::load_config;
/// use ck_core::tasks::registry::TaskRegistry;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = TaskRegistry::builtin();
/// let config = load_config(Path::new("."), &registry).await?;
/// println!("Loaded {} pipelines", config.definition.pipelines.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path, registry: &TaskRegistry) -> ConfigResult<AppConfig> {
    let ck_dir = root.join(".content-kit");

    // If .content-kit doesn't exist, return default config
    if !ck_dir.exists() {
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&ck_dir)?;
    validate_weights(&global)?;

    let specs = load_pipelines(&ck_dir)?;
    let flow = load_flow(&ck_dir)?;
    let branching = load_branching(&ck_dir)?;

    let definition = PipelineDefinition::assemble(specs, flow, branching);
    definition.validate(registry)?;

    tracing::info!(
        pipelines = definition.pipelines.len(),
        sub_pipelines = definition.sub_pipelines.len(),
        "pipeline definition loaded"
    );

    Ok(AppConfig { global, definition })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(ck_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = ck_dir.join("config.toml");

    // If config.toml doesn't exist, return default
    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path,
            source,
        })?;

    Ok(config)
}

fn validate_weights(global: &GlobalConfig) -> ConfigResult<()> {
    let sum = global.scoring.weights.sum();
    if (sum - 1.0).abs() > 1e-6 {
        return Err(ConfigError::InvalidWeights { sum });
    }
    Ok(())
}

/// Loads all pipeline definitions from `pipelines/*.yaml`.
fn load_pipelines(ck_dir: &Path) -> ConfigResult<Vec<PipelineSpec>> {
    let pipelines_dir = ck_dir.join("pipelines");

    // If pipelines directory doesn't exist, return empty vector
    if !pipelines_dir.exists() {
        return Ok(Vec::new());
    }

    let mut seen: HashMap<String, ()> = HashMap::new();
    let mut pipelines = Vec::new();

    // Walk through all .yaml and .yml files in the pipelines directory
    for entry in WalkDir::new(&pipelines_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: pipelines_dir.clone(),
            source,
        })?;

        let path = entry.path();

        // Only process .yaml and .yml files
        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let pipeline: PipelineSpec =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        if seen.insert(pipeline.name.clone(), ()).is_some() {
            return Err(ConfigError::DuplicatePipeline {
                name: pipeline.name,
                path: path.to_path_buf(),
            });
        }

        pipelines.push(pipeline);
    }

    Ok(pipelines)
}

/// Loads the context-passing table from `flow.yaml`, if present.
fn load_flow(ck_dir: &Path) -> ConfigResult<FlowTable> {
    load_optional_yaml(ck_dir.join("flow.yaml"))
}

/// Loads sub-pipelines and branching rules from `branching.yaml`, if present.
fn load_branching(ck_dir: &Path) -> ConfigResult<BranchingTable> {
    load_optional_yaml(ck_dir.join("branching.yaml"))
}

fn load_optional_yaml<T: serde::de::DeserializeOwned + Default>(
    path: std::path::PathBuf,
) -> ConfigResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
        path: path.clone(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse { path, source })
}
