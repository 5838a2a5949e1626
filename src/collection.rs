//! YAML collection files: loading, record access, and writing back

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Key under which keyed documents hold their record list
const RECORDS_KEY: &str = "programs";

#[derive(thiserror::Error, Debug)]
pub enum CollectionError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid YAML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{}: {message}", .path.display())]
    Shape { path: PathBuf, message: String },
    #[error("failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

/// A named, ordered group of records backed by one YAML file
#[derive(Debug, Clone)]
pub struct Collection {
    /// File stem, e.g. `food` for `food.yml`
    pub name: String,
    /// Backing file
    pub path: PathBuf,
    document: Value,
}

impl Collection {
    /// Read and parse a collection file
    pub fn load(path: &Path) -> Result<Self, CollectionError> {
        let content = fs::read_to_string(path).map_err(|source| CollectionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse collection content as if it had been read from `path`
    pub fn parse(path: &Path, content: &str) -> Result<Self, CollectionError> {
        let document: Value =
            serde_yaml::from_str(content).map_err(|source| CollectionError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        match &document {
            Value::Null | Value::Sequence(_) => {}
            Value::Mapping(map) => match map.get(RECORDS_KEY) {
                None | Some(Value::Null) | Some(Value::Sequence(_)) => {}
                Some(_) => {
                    return Err(CollectionError::Shape {
                        path: path.to_path_buf(),
                        message: format!("`{}` is not a list", RECORDS_KEY),
                    })
                }
            },
            _ => {
                return Err(CollectionError::Shape {
                    path: path.to_path_buf(),
                    message: "expected a list of records or a mapping with `programs`".to_string(),
                })
            }
        }

        Ok(Self {
            name: collection_name(path),
            path: path.to_path_buf(),
            document,
        })
    }

    /// Records in file order. Entries that are not mappings are skipped.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.entries()
            .into_iter()
            .flatten()
            .filter_map(Value::as_mapping)
            .map(|fields| Record { fields })
    }

    /// Mutable access to record mappings, in file order
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut Mapping> {
        self.entries_mut()
            .into_iter()
            .flatten()
            .filter_map(Value::as_mapping_mut)
    }

    fn entries(&self) -> Option<&Vec<Value>> {
        match &self.document {
            Value::Sequence(seq) => Some(seq),
            Value::Mapping(map) => map.get(RECORDS_KEY).and_then(Value::as_sequence),
            _ => None,
        }
    }

    fn entries_mut(&mut self) -> Option<&mut Vec<Value>> {
        match &mut self.document {
            Value::Sequence(seq) => Some(seq),
            Value::Mapping(map) => map.get_mut(RECORDS_KEY).and_then(Value::as_sequence_mut),
            _ => None,
        }
    }

    /// Serialize the document, keeping its shape and key order
    pub fn to_yaml(&self) -> Result<String, CollectionError> {
        serde_yaml::to_string(&self.document).map_err(|e| CollectionError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write the document back to its backing file
    pub fn save(&self) -> Result<(), CollectionError> {
        let yaml = self.to_yaml()?;
        fs::write(&self.path, yaml).map_err(|e| CollectionError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

/// Read-only view over one record mapping
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: &'a Mapping,
}

impl<'a> Record<'a> {
    pub fn new(fields: &'a Mapping) -> Self {
        Self { fields }
    }

    /// Non-empty string name
    pub fn name(&self) -> Option<&'a str> {
        string_field(self.fields, "name").filter(|n| !n.trim().is_empty())
    }

    /// Description text; non-string values count as missing
    pub fn description(&self) -> Option<&'a str> {
        string_field(self.fields, "description")
    }

    /// Whether the record is maintained by an external sync
    pub fn is_synced(&self) -> bool {
        matches!(self.fields.get("sync_source"), Some(v) if !v.is_null())
    }

    /// Stable identifier: `id` when present, otherwise the name
    pub fn identifier(&self) -> Option<&'a str> {
        string_field(self.fields, "id")
            .filter(|id| !id.trim().is_empty())
            .or_else(|| self.name())
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }
}

fn string_field<'a>(fields: &'a Mapping, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Collection name for a file path (its stem)
pub fn collection_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Whether a path looks like a collection file
pub fn is_collection_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    )
}

/// List collection files directly inside `dir`, sorted by file name
pub fn list_collection_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // An unreadable entry is passed on so loading it fails for that file alone
            Err(e) => match e.path() {
                Some(path) if e.depth() > 0 => {
                    if is_collection_file(path) {
                        files.push(path.to_path_buf());
                    }
                    continue;
                }
                _ => anyhow::bail!("Failed to list data directory {}: {}", dir.display(), e),
            },
        };
        let path = entry.path();
        if entry.file_type().is_file() && is_collection_file(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
