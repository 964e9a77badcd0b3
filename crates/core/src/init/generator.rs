//! Directory structure and file generation for .content-kit initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for initializing a .content-kit directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where .content-kit will be created.
    pub target_dir: PathBuf,

    /// Overwrite existing .content-kit directory if it exists.
    pub force: bool,

    /// Create minimal template (config plus the quick-keywords pipeline,
    /// no branching tables).
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a complete .content-kit directory structure with templates.
///
/// This function creates the following structure:
/// ```text
/// .content-kit/
/// ├── config.toml
/// ├── flow.yaml
/// ├── branching.yaml (unless minimal)
/// └── pipelines/
///     ├── quick-keywords.yaml
///     └── content-analysis.yaml (unless minimal)
/// ```
///
/// # Errors
/// Returns an `InitError` if:
/// - The .content-kit directory already exists (without force flag)
/// - A template file cannot be found
/// - File system operations fail
pub async fn generate_structure(options: InitOptions) -> InitResult<()> {
    let ck_dir = options.target_dir.join(".content-kit");

    // Check if directory exists
    if ck_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(ck_dir));
    }

    // Create directory structure
    fs::create_dir_all(ck_dir.join("pipelines")).map_err(|source| InitError::DirectoryCreate {
        path: ck_dir.join("pipelines"),
        source,
    })?;

    write_template_file(&ck_dir, "config.toml")?;
    write_template_file(&ck_dir, "flow.yaml")?;

    if options.minimal {
        write_template_file(&ck_dir, "pipelines/quick-keywords.yaml")?;
    } else {
        write_template_file(&ck_dir, "branching.yaml")?;
        for pipeline_path in list_templates("pipelines/") {
            write_template_file(&ck_dir, &pipeline_path)?;
        }
    }

    Ok(())
}

/// Helper function to write a template file to the target directory.
fn write_template_file(ck_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = ck_dir.join(template_path);

    // Ensure parent directory exists
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path,
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A generated structure loads cleanly against the builtin registry.
    #[tokio::test]
    async fn test_generate_structure_success() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        };

        let result = generate_structure(options).await;
        assert!(result.is_ok(), "Failed: {:?}", result.err());

        let ck_dir = dir.path().join(".content-kit");
        assert!(ck_dir.exists(), ".content-kit directory should exist");
        assert!(ck_dir.join("pipelines").exists());
        assert!(ck_dir.join("config.toml").exists());
        assert!(ck_dir.join("flow.yaml").exists());
        assert!(ck_dir.join("branching.yaml").exists());
        assert!(ck_dir.join("pipelines/content-analysis.yaml").exists());
        assert!(ck_dir.join("pipelines/quick-keywords.yaml").exists());

        // The generated configuration is valid end to end
        let registry = crate::tasks::registry::TaskRegistry::builtin();
        let config = crate::config::loader::load_config(dir.path(), &registry)
            .await
            .expect("generated structure should load");
        assert!(config.definition.pipeline("content-analysis").is_some());
        assert!(config.definition.pipeline("quick-keywords").is_some());
    }

    /// Test minimal mode generates only essential files.
    #[tokio::test]
    async fn test_generate_structure_minimal() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: true,
        };

        generate_structure(options).await.unwrap();

        let ck_dir = dir.path().join(".content-kit");
        assert!(ck_dir.join("pipelines/quick-keywords.yaml").exists());
        assert!(
            !ck_dir.join("pipelines/content-analysis.yaml").exists(),
            "content-analysis.yaml should not exist in minimal mode"
        );
        assert!(
            !ck_dir.join("branching.yaml").exists(),
            "branching.yaml should not exist in minimal mode"
        );
    }

    /// Test that existing directory without force flag returns error.
    #[tokio::test]
    async fn test_generate_structure_exists_without_force() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".content-kit")).unwrap();

        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        };

        let result = generate_structure(options).await;
        assert!(result.is_err(), "Should fail when directory exists");
        assert!(
            matches!(result.unwrap_err(), InitError::DirectoryExists(_)),
            "Should return DirectoryExists error"
        );
    }

    /// Test that existing directory with force flag succeeds.
    #[tokio::test]
    async fn test_generate_structure_exists_with_force() {
        let dir = tempdir().unwrap();
        let ck_dir = dir.path().join(".content-kit");
        fs::create_dir_all(&ck_dir).unwrap();
        fs::write(ck_dir.join("old-file.txt"), "old content").unwrap();

        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: true,
            minimal: false,
        };

        let result = generate_structure(options).await;
        assert!(result.is_ok(), "Should succeed with force flag");
        assert!(ck_dir.join("config.toml").exists());
    }

    /// Test default InitOptions.
    #[test]
    fn test_default_init_options() {
        let options = InitOptions::default();
        assert!(!options.force, "Default force should be false");
        assert!(!options.minimal, "Default minimal should be false");
        assert!(
            options.target_dir.is_absolute() || options.target_dir == PathBuf::from("."),
            "Default target_dir should be current directory"
        );
    }
}
