//! Maintenance passes that rewrite collection files in place

pub mod coordinates;
pub mod verified;

pub use coordinates::{
    extract_coordinates, migrate_coordinates, CoordinateMigration, Coordinates,
};
pub use verified::{stamp_verified, StampSummary, VerificationList};

use crate::analyzer::engine::CollectionFailure;
use crate::collection::{collection_name, list_collection_files, Collection};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// File-level outcome of a rewrite pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassOutcome {
    /// Files that changed (and were written unless this was a dry run)
    pub files_changed: Vec<PathBuf>,
    pub failures: Vec<CollectionFailure>,
    pub missing_dirs: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Load every collection under `dirs`, let `edit` change it, and write back the
/// ones `edit` reports as changed. Load and write failures are recorded per file.
pub(crate) fn rewrite_collections<F>(
    dirs: &[PathBuf],
    dry_run: bool,
    mut edit: F,
) -> Result<PassOutcome>
where
    F: FnMut(&mut Collection) -> bool,
{
    let mut outcome = PassOutcome {
        dry_run,
        ..PassOutcome::default()
    };

    for dir in dirs {
        if !dir.exists() {
            outcome.missing_dirs.push(dir.clone());
            continue;
        }
        for path in list_collection_files(dir)? {
            let mut collection = match Collection::load(&path) {
                Ok(c) => c,
                Err(e) => {
                    outcome.failures.push(CollectionFailure {
                        collection: collection_name(&path),
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if !edit(&mut collection) {
                continue;
            }
            if !dry_run {
                if let Err(e) = collection.save() {
                    outcome.failures.push(CollectionFailure {
                        collection: collection.name.clone(),
                        path: path.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            }
            outcome.files_changed.push(path);
        }
    }

    Ok(outcome)
}
