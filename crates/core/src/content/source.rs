//! Content sources.
//!
//! The pipeline does not care whether records come from a filesystem, a
//! network endpoint, or a database; it consumes anything implementing
//! [`ContentSource`]. The bundled [`FileSource`] reads a directory of
//! `*.json` records and `*.md` records with YAML front matter.

use crate::content::normalize::{normalize_record, ContentError};
use async_trait::async_trait;
use ck_protocol::content_models::ContentRecord;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A call returning zero or more content records.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ContentRecord>, ContentError>;
}

/// Reads content records from a local directory.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ContentSource for FileSource {
    async fn fetch(&self) -> Result<Vec<ContentRecord>, ContentError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = entry.map_err(|source| ContentError::DirectoryWalk {
                path: self.root.clone(),
                source,
            })?;

            let path = entry.path();
            match path.extension().and_then(|s| s.to_str()) {
                Some("json") | Some("md") | Some("markdown") => {
                    records.push(read_record(path)?);
                }
                _ => continue,
            }
        }

        Ok(records)
    }
}

/// Read a single content record from a `.json` or `.md` file.
pub fn read_record(path: &Path) -> Result<ContentRecord, ContentError> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => read_json_record(path),
        Some("md") | Some("markdown") => read_markdown_record(path),
        _ => Err(ContentError::UnsupportedExtension {
            path: path.to_path_buf(),
        }),
    }
}

fn read_json_record(path: &Path) -> Result<ContentRecord, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|source| ContentError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| ContentError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    normalize_record(value)
}

/// Markdown records carry their fields as YAML front matter; the markdown
/// body becomes the record body unless the front matter sets one.
fn read_markdown_record(path: &Path) -> Result<ContentRecord, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|source| ContentError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let matter = Matter::<YAML>::new();
    let result = matter.parse(&content);

    let front: Value = result
        .data
        .ok_or_else(|| ContentError::Parse {
            path: path.to_path_buf(),
            reason: "Missing YAML front matter".to_string(),
        })?
        .deserialize()
        .map_err(|e| ContentError::Parse {
            path: path.to_path_buf(),
            reason: format!("Failed to deserialize front matter: {}", e),
        })?;

    let mut object = match front {
        Value::Object(map) => map,
        _ => {
            return Err(ContentError::Parse {
                path: path.to_path_buf(),
                reason: "Front matter must be a mapping".to_string(),
            })
        }
    };

    let body = result.content.trim();
    if !body.is_empty() && !object.contains_key("body") && !object.contains_key("content") {
        object.insert("body".to_string(), Value::String(body.to_string()));
    }

    normalize_record(Value::Object(object))
}
