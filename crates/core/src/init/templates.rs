//! Embedded template files for .content-kit initialization.
//!
//! This module uses `rust-embed` to embed template files from the project
//! root `templates/` directory into the binary at compile time. This allows
//! the CLI to generate `.content-kit/` structures without external file
//! dependencies.

use rust_embed::RustEmbed;

/// Embedded template files from the `templates/` directory.
///
/// At compile time, all files in the project root `templates/` directory are
/// embedded into the binary. The path is calculated relative to the crate
/// root:
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../templates` = project root `templates/`
///
/// During development with the `debug-embed` feature, files are read from
/// the filesystem at runtime, allowing for quick iteration without
/// recompilation.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path.
///
/// # Arguments
/// * `path` - Relative path from templates root (e.g., "config.toml",
///   "pipelines/content-analysis.yaml")
///
/// # Returns
/// The file content as a String, or None if the file doesn't exist.
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all template files in a directory.
///
/// # Arguments
/// * `prefix` - Directory prefix (e.g., "pipelines/")
///
/// # Returns
/// A vector of file paths that match the prefix.
pub fn list_templates(prefix: &str) -> Vec<String> {
    TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_template() {
        let config = get_template("config.toml");
        assert!(config.is_some(), "config.toml should be embedded");
        let content = config.unwrap();
        assert!(
            content.contains("step-timeout-secs"),
            "config.toml should contain engine settings"
        );
    }

    #[test]
    fn test_get_flow_template() {
        let flow = get_template("flow.yaml");
        assert!(flow.is_some(), "flow.yaml should be embedded");
        assert!(flow.unwrap().contains("keyword_placement"));
    }

    #[test]
    fn test_get_branching_template() {
        let branching = get_template("branching.yaml");
        assert!(branching.is_some(), "branching.yaml should be embedded");
        assert!(branching.unwrap().contains("analyze-blog-post"));
    }

    #[test]
    fn test_get_pipeline_templates() {
        let analysis = get_template("pipelines/content-analysis.yaml");
        assert!(analysis.is_some());
        assert!(analysis.unwrap().contains("name: content-analysis"));

        let quick = get_template("pipelines/quick-keywords.yaml");
        assert!(quick.is_some());
        assert!(quick.unwrap().contains("name: quick-keywords"));
    }

    #[test]
    fn test_get_nonexistent_template() {
        let result = get_template("nonexistent.txt");
        assert!(result.is_none(), "Nonexistent files should return None");
    }

    #[test]
    fn test_list_pipeline_templates() {
        let pipelines = list_templates("pipelines/");
        assert!(
            pipelines.contains(&"pipelines/content-analysis.yaml".to_string()),
            "Should contain content-analysis.yaml"
        );
        assert!(
            pipelines.contains(&"pipelines/quick-keywords.yaml".to_string()),
            "Should contain quick-keywords.yaml"
        );
    }

    #[test]
    fn test_list_empty_prefix() {
        let all = list_templates("");
        // config.toml, flow.yaml, branching.yaml, 2 pipelines
        assert!(all.len() >= 5, "Should have at least 5 template files");
    }
}
