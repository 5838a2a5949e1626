//! Corpus scanner - walks collections and scores eligible records

use crate::collection::{list_collection_files, Collection};
use crate::config::{build_ignore_set, is_ignored, Config};
use crate::ScoreResult;
use anyhow::Result;
use globset::GlobSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Collection names excluded from scoring. Fixed for the lifetime of a scanner.
#[derive(Debug, Clone, Default)]
pub struct ExclusionLists {
    /// Configuration, taxonomy, and geographic reference collections
    pub non_prose: Vec<String>,
    /// Collections generated from external sources
    pub auto_generated: Vec<String>,
}

impl ExclusionLists {
    pub fn from_config(config: &Config) -> Self {
        Self {
            non_prose: config.non_prose_collections(),
            auto_generated: config.auto_generated_collections(),
        }
    }

    /// Why a collection is excluded, if it is
    pub fn reason_for(&self, collection: &str) -> Option<ExclusionReason> {
        if self.non_prose.iter().any(|n| n == collection) {
            Some(ExclusionReason::NonProse)
        } else if self.auto_generated.iter().any(|n| n == collection) {
            Some(ExclusionReason::AutoGenerated)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionReason {
    NonProse,
    AutoGenerated,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::NonProse => write!(f, "non-prose"),
            ExclusionReason::AutoGenerated => write!(f, "auto-generated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedCollection {
    pub name: String,
    pub reason: ExclusionReason,
}

/// A collection that could not be loaded and was skipped
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFailure {
    pub collection: String,
    pub path: PathBuf,
    pub message: String,
}

/// Everything a scan produced
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    /// One result per eligible record, in encounter order
    pub results: Vec<ScoreResult>,
    /// Records skipped because an external sync owns their text
    pub skipped_synced: usize,
    /// Records skipped because they have no usable name
    pub skipped_unnamed: usize,
    /// Collections whose records were considered
    pub collections_scanned: usize,
    pub excluded: Vec<ExcludedCollection>,
    pub failures: Vec<CollectionFailure>,
    /// Data directories that do not exist
    pub missing_dirs: Vec<PathBuf>,
}

/// Scans data directories and scores every eligible record
pub struct CorpusScanner {
    exclusions: ExclusionLists,
    ignore_set: Option<GlobSet>,
}

impl CorpusScanner {
    /// Create a scanner with the given exclusion lists
    pub fn new(exclusions: ExclusionLists) -> Self {
        Self {
            exclusions,
            ignore_set: None,
        }
    }

    /// Skip collection files matching these globs
    pub fn with_ignore_set(mut self, ignore_set: GlobSet) -> Self {
        self.ignore_set = Some(ignore_set);
        self
    }

    /// Build a scanner from config (exclusion lists and ignore globs)
    pub fn from_config(config: &Config) -> Result<Self> {
        let scanner = Self::new(ExclusionLists::from_config(config));
        if config.ignore.is_empty() {
            Ok(scanner)
        } else {
            Ok(scanner.with_ignore_set(build_ignore_set(&config.ignore)?))
        }
    }

    pub fn exclusions(&self) -> &ExclusionLists {
        &self.exclusions
    }

    /// Scan each directory in order. A missing directory is recorded and skipped;
    /// a path that exists but cannot be listed is an error.
    pub fn scan(&self, dirs: &[PathBuf]) -> Result<ScanOutcome> {
        let mut outcome = ScanOutcome::default();
        for dir in dirs {
            if !dir.exists() {
                outcome.missing_dirs.push(dir.clone());
                continue;
            }
            for path in list_collection_files(dir)? {
                self.scan_file(&path, &mut outcome);
            }
        }
        Ok(outcome)
    }

    /// Load and score one collection file. Load failures are recorded, not returned.
    pub fn scan_file(&self, path: &Path, outcome: &mut ScanOutcome) {
        if let Some(set) = &self.ignore_set {
            if is_ignored(path, set) {
                return;
            }
        }

        let name = crate::collection::collection_name(path);
        if let Some(reason) = self.exclusions.reason_for(&name) {
            outcome.excluded.push(ExcludedCollection { name, reason });
            return;
        }

        match Collection::load(path) {
            Ok(collection) => self.scan_collection(&collection, outcome),
            Err(e) => outcome.failures.push(CollectionFailure {
                collection: name,
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Score the eligible records of an already-loaded collection
    pub fn scan_collection(&self, collection: &Collection, outcome: &mut ScanOutcome) {
        if let Some(reason) = self.exclusions.reason_for(&collection.name) {
            outcome.excluded.push(ExcludedCollection {
                name: collection.name.clone(),
                reason,
            });
            return;
        }

        outcome.collections_scanned += 1;
        for record in collection.records() {
            let Some(name) = record.name() else {
                outcome.skipped_unnamed += 1;
                continue;
            };
            if record.is_synced() {
                outcome.skipped_synced += 1;
                continue;
            }
            outcome
                .results
                .push(ScoreResult::new(&collection.name, name, record.description()));
        }
    }
}
