//! Shared utilities for command handlers

use crate::error::{Error, Result};
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Path argument that selects standard input
const STDIN_PATH: &str = "-";

/// Read a JSON or YAML document from a file, or from stdin for `-`
pub fn read_document(path: &Path) -> Result<Value> {
    if path.as_os_str() == STDIN_PATH {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read standard input")?;
        return parse_document(&content, path, false);
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read input document");
    parse_document(&content, path, is_yaml(path))
}

fn parse_document(content: &str, path: &Path, yaml: bool) -> Result<Value> {
    if yaml {
        serde_yaml::from_str(content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Write a value to a file as pretty JSON, or YAML for `.yaml`/`.yml`
pub fn save_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "Saved output document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_json_and_yaml_documents() {
        let dir = TempDir::new().unwrap();

        let json_path = dir.path().join("failure.json");
        fs::write(&json_path, r#"{ "status": 404 }"#).unwrap();
        assert_eq!(read_document(&json_path).unwrap(), serde_json::json!({ "status": 404 }));

        let yaml_path = dir.path().join("failure.yaml");
        fs::write(&yaml_path, "status: 429\nheaders:\n  Retry-After: \"30\"\n").unwrap();
        let value = read_document(&yaml_path).unwrap();
        assert_eq!(value["status"], 429);
        assert_eq!(value["headers"]["Retry-After"], "30");
    }

    #[test]
    fn test_read_errors() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(read_document(&missing), Err(Error::FileNotFound { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(read_document(&broken), Err(Error::InvalidFormat { .. })));
    }

    #[test]
    fn test_save_document_round_trip() {
        let dir = TempDir::new().unwrap();
        let value = serde_json::json!({ "success": true, "count": 2 });

        for name in ["out/result.json", "result.yaml"] {
            let path = dir.path().join(name);
            save_document(&path, &value).unwrap();
            assert_eq!(read_document(&path).unwrap(), value, "{}", name);
        }
    }
}
