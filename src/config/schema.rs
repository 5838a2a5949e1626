//! Config schema and deserialization

use serde::Deserialize;

/// Data directories scanned when neither the CLI nor the config names any
pub const DEFAULT_DATA_DIRS: &[&str] = &["_data/programs", "_data/college-university"];

/// Collections holding configuration, taxonomy, or geographic reference data
pub const DEFAULT_NON_PROSE_COLLECTIONS: &[&str] = &[
    "categories",
    "cities",
    "counties",
    "eligibility",
    "groups",
    "neighborhoods",
    "site-config",
    "zip-codes",
];

/// Collections generated from external sources rather than written in-house
pub const DEFAULT_AUTO_GENERATED_COLLECTIONS: &[&str] =
    &["external-resources", "imported-resources"];

/// Geographic box that migrated coordinates must fall inside
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Inclusive containment check
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

impl Default for BoundingBox {
    /// San Francisco Bay Area
    fn default() -> Self {
        Self {
            min_latitude: 36.8,
            max_latitude: 38.9,
            min_longitude: -123.6,
            max_longitude: -121.2,
        }
    }
}

/// Root config structure for .readgraderc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Data directories holding collection files
    #[serde(default)]
    pub data_dirs: Vec<String>,

    /// Collections excluded from scoring because they hold no prose
    #[serde(default)]
    pub non_prose_collections: Option<Vec<String>>,

    /// Collections excluded from scoring because they are generated externally
    #[serde(default)]
    pub auto_generated_collections: Option<Vec<String>>,

    /// Glob patterns for collection files to skip
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Length of the ranked list in reports
    #[serde(default)]
    pub top: Option<usize>,

    /// Box that migrated coordinates must fall inside
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,

    /// Directory of the config file that was loaded; relative data dirs resolve here
    #[serde(skip)]
    pub root: Option<std::path::PathBuf>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_data_dirs: &[std::path::PathBuf],
        cli_top: Option<usize>,
    ) -> Self {
        if !cli_data_dirs.is_empty() {
            self.data_dirs = cli_data_dirs
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            // Paths given on the command line are relative to the working directory
            self.root = None;
        }
        if cli_top.is_some() {
            self.top = cli_top;
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.data_dirs.is_empty() {
            self.data_dirs = base.data_dirs;
        }
        if self.non_prose_collections.is_none() {
            self.non_prose_collections = base.non_prose_collections;
        }
        if self.auto_generated_collections.is_none() {
            self.auto_generated_collections = base.auto_generated_collections;
        }
        if self.top.is_none() {
            self.top = base.top;
        }
        if self.bounding_box.is_none() {
            self.bounding_box = base.bounding_box;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;
    }

    /// Data directories, falling back to the defaults
    pub fn data_dirs(&self) -> Vec<String> {
        if self.data_dirs.is_empty() {
            to_owned_list(DEFAULT_DATA_DIRS)
        } else {
            self.data_dirs.clone()
        }
    }

    /// Data directories joined onto the config file's directory, or onto `work_dir`
    /// when no config file was loaded. Absolute entries are kept as they are.
    pub fn resolve_data_dirs(&self, work_dir: &std::path::Path) -> Vec<std::path::PathBuf> {
        let base = self.root.as_deref().unwrap_or(work_dir);
        self.data_dirs().iter().map(|d| base.join(d)).collect()
    }

    pub fn non_prose_collections(&self) -> Vec<String> {
        self.non_prose_collections
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_NON_PROSE_COLLECTIONS))
    }

    pub fn auto_generated_collections(&self) -> Vec<String> {
        self.auto_generated_collections
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_AUTO_GENERATED_COLLECTIONS))
    }

    pub fn top(&self) -> usize {
        self.top.unwrap_or(crate::DEFAULT_TOP)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box.unwrap_or_default()
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
