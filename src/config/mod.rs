//! Configuration loading for Readgrade

mod schema;

pub use schema::{
    BoundingBox, Config, DEFAULT_AUTO_GENERATED_COLLECTIONS, DEFAULT_DATA_DIRS,
    DEFAULT_NON_PROSE_COLLECTIONS,
};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".readgraderc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            let mut config = load_config_with_extends(&path, &mut HashSet::new())?;
            config.root = path.parent().map(Path::to_path_buf);
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference (relative to the extending file) to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = config_dir.join(extends);

    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .readgraderc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

/// Default config file contents written by `readgrade init`
pub fn default_config_json() -> String {
    let quoted = |items: &[&str]| {
        items
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let bbox = BoundingBox::default();
    format!(
        r#"{{
  "dataDirs": [{}],
  "nonProseCollections": [{}],
  "autoGeneratedCollections": [{}],
  "ignore": [],
  "top": {},
  "boundingBox": {{
    "minLatitude": {:?},
    "maxLatitude": {:?},
    "minLongitude": {:?},
    "maxLongitude": {:?}
  }}
}}
"#,
        quoted(DEFAULT_DATA_DIRS),
        quoted(DEFAULT_NON_PROSE_COLLECTIONS),
        quoted(DEFAULT_AUTO_GENERATED_COLLECTIONS),
        crate::DEFAULT_TOP,
        bbox.min_latitude,
        bbox.max_latitude,
        bbox.min_longitude,
        bbox.max_longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.top(), 20);
        assert_eq!(config.data_dirs(), vec!["_data/programs", "_data/college-university"]);
        assert!(config.non_prose_collections().contains(&"categories".to_string()));
        assert_eq!(config.bounding_box(), BoundingBox::default());
    }

    #[test]
    fn test_explicit_config_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_found_in_parent_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{ "top": 5 }"#).unwrap();
        let nested = dir.path().join("_data").join("programs");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.top(), 5);
        assert_eq!(
            config.resolve_data_dirs(&nested),
            vec![
                dir.path().join("_data/programs"),
                dir.path().join("_data/college-university")
            ]
        );
    }

    #[test]
    fn test_is_ignored_drafts() {
        let set = build_ignore_set(&["**/drafts-*.yml".to_string()]).unwrap();
        assert!(is_ignored(Path::new("_data/programs/drafts-food.yml"), &set));
        assert!(!is_ignored(Path::new("_data/programs/food.yml"), &set));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        assert!(build_ignore_set(&["[".to_string()]).is_err());
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();

        let base_path = dir.path().join("base.json");
        let mut base_file = fs::File::create(&base_path).unwrap();
        writeln!(
            base_file,
            r#"{{
                "top": 10,
                "nonProseCollections": ["cities"],
                "ignore": ["**/legacy-*.yml"]
            }}"#
        )
        .unwrap();

        let child_path = dir.path().join(CONFIG_FILENAME);
        let mut child_file = fs::File::create(&child_path).unwrap();
        writeln!(
            child_file,
            r#"{{
                "extends": "./base",
                "top": 15,
                "ignore": ["**/drafts-*.yml"]
            }}"#
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();

        assert_eq!(config.top(), 15);
        assert_eq!(config.non_prose_collections(), vec!["cities"]);
        assert_eq!(config.ignore, vec!["**/legacy-*.yml", "**/drafts-*.yml"]);
        // Default still applies where neither file says anything
        assert_eq!(
            config.auto_generated_collections(),
            vec!["external-resources", "imported-resources"]
        );
    }

    #[test]
    fn test_circular_extends() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Circular extends"));
    }

    #[test]
    fn test_merge_with_cli() {
        let config = Config {
            data_dirs: vec!["data".to_string()],
            top: Some(5),
            ..Config::default()
        }
        .merge_with_cli(&[PathBuf::from("other")], Some(3));
        assert_eq!(config.data_dirs(), vec!["other"]);
        assert_eq!(config.top(), 3);

        let untouched = Config::default().merge_with_cli(&[], None);
        assert_eq!(untouched.top(), 20);
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let config: Config = serde_json::from_str(&default_config_json()).unwrap();
        assert_eq!(config.top(), 20);
        assert_eq!(config.bounding_box(), BoundingBox::default());
        assert_eq!(config.data_dirs(), vec!["_data/programs", "_data/college-university"]);
    }

    #[test]
    fn test_bounding_box_contains() {
        let bbox = BoundingBox::default();
        assert!(bbox.contains(37.5, -122.3));
        assert!(!bbox.contains(10.0, 10.0));
        assert!(bbox.contains(36.8, -123.6));
    }
}
