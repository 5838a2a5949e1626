//! Aggregation of scan results into a ranked readability report

use super::engine::{CollectionFailure, ExcludedCollection, ScanOutcome};
use crate::{ScoreResult, ERROR_GRADE, HARD_GRADE, WARN_GRADE};
use serde::Serialize;
use std::path::PathBuf;

/// Aggregate readability figures for one run. Advisory only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityReport {
    /// Records that were scored
    pub eligible: usize,
    pub skipped_synced: usize,
    pub above_grade_8: usize,
    pub above_grade_10: usize,
    pub above_grade_12: usize,
    /// Share of eligible records above grade 10, in percent
    pub percent_above_grade_10: f64,
    /// Hardest descriptions first
    pub top: Vec<ScoreResult>,
    /// All results in encounter order
    pub results: Vec<ScoreResult>,
    pub collections_scanned: usize,
    pub excluded_collections: Vec<ExcludedCollection>,
    pub failures: Vec<CollectionFailure>,
    pub missing_dirs: Vec<PathBuf>,
}

impl ReadabilityReport {
    pub fn build(outcome: &ScanOutcome, top_n: usize) -> Self {
        let results = &outcome.results;
        let count_above = |limit: f64| results.iter().filter(|r| r.grade > limit).count();

        let eligible = results.len();
        let above_grade_10 = count_above(HARD_GRADE);
        let percent_above_grade_10 = if eligible == 0 {
            0.0
        } else {
            above_grade_10 as f64 * 100.0 / eligible as f64
        };

        Self {
            eligible,
            skipped_synced: outcome.skipped_synced,
            above_grade_8: count_above(WARN_GRADE),
            above_grade_10,
            above_grade_12: count_above(ERROR_GRADE),
            percent_above_grade_10,
            top: rank(results, top_n),
            results: results.clone(),
            collections_scanned: outcome.collections_scanned,
            excluded_collections: outcome.excluded.clone(),
            failures: outcome.failures.clone(),
            missing_dirs: outcome.missing_dirs.clone(),
        }
    }
}

/// The `n` highest grades, descending. Equal grades keep encounter order.
pub fn rank(results: &[ScoreResult], n: usize) -> Vec<ScoreResult> {
    let mut sorted: Vec<ScoreResult> = results.to_vec();
    // sort_by is stable
    sorted.sort_by(|a, b| b.grade.total_cmp(&a.grade));
    sorted.truncate(n);
    sorted
}
