//! Integration tests: full scans of the fixture site through the library API.

use readgrade::analyzer::engine::ExclusionReason;
use readgrade::analyzer::{CorpusScanner, ExclusionLists, ReadabilityReport};
use readgrade::config::load_config;
use readgrade::{score_site, GradeBand};
use std::path::{Path, PathBuf};

const SITE: &str = "test-data/site";

fn site_report() -> ReadabilityReport {
    score_site(Path::new(SITE), None).expect("fixture site should scan")
}

#[test]
fn fixture_site_counts() {
    let report = site_report();
    assert_eq!(report.eligible, 11);
    assert_eq!(report.skipped_synced, 1);
    assert_eq!(report.above_grade_8, 6);
    assert_eq!(report.above_grade_10, 4);
    assert_eq!(report.above_grade_12, 3);
    assert!((report.percent_above_grade_10 - 400.0 / 11.0).abs() < 1e-9);
    assert_eq!(report.collections_scanned, 4);
}

#[test]
fn fixture_site_top_uses_config_limit() {
    let report = site_report();
    let top: Vec<(&str, f64)> = report
        .top
        .iter()
        .map(|r| (r.name.as_str(), r.grade))
        .collect();
    assert_eq!(
        top,
        vec![
            ("Utility Rebate", 28.6),
            ("Campus Food Pantry", 28.5),
            ("Broadband Assistance", 16.8),
            ("Energy Credit", 10.8),
            ("Transit Fare Card", 10.0),
            ("Power Bill Credit", 9.8),
            ("Water Bill Discount", 7.2),
            ("Semester Transit Pass", 3.6),
            ("Museum Passes", 3.2),
            ("Fresh Produce Match", 0.7),
        ]
    );
}

#[test]
fn fixture_site_results_keep_encounter_order() {
    let report = site_report();
    let collections: Vec<&str> = report
        .results
        .iter()
        .map(|r| r.collection.as_str())
        .collect();
    assert_eq!(collections.first(), Some(&"culture"));
    assert_eq!(collections.last(), Some(&"campus"));
    assert!(collections.iter().all(|c| *c != "categories"));
}

#[test]
fn synced_record_is_never_scored() {
    let report = site_report();
    assert!(report.results.iter().all(|r| r.name != "County Rehab Services"));
}

#[test]
fn missing_description_scores_zero() {
    let report = site_report();
    let pantry = report
        .results
        .iter()
        .find(|r| r.name == "Pantry Locator")
        .unwrap();
    assert_eq!(pantry.grade, 0.0);
    assert_eq!(pantry.band, GradeBand::Easy);
    assert_eq!(pantry.description_length, 0);
}

#[test]
fn malformed_collection_is_reported_and_skipped() {
    let report = site_report();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].collection, "broken");
    assert!(report.failures[0].path.ends_with("broken.yml"));
}

#[test]
fn excluded_collections_are_listed() {
    let report = site_report();
    let excluded: Vec<(&str, ExclusionReason)> = report
        .excluded_collections
        .iter()
        .map(|e| (e.name.as_str(), e.reason))
        .collect();
    assert_eq!(
        excluded,
        vec![
            ("categories", ExclusionReason::NonProse),
            ("external-resources", ExclusionReason::AutoGenerated),
        ]
    );
}

#[test]
fn custom_exclusions_change_eligibility() {
    let scanner = CorpusScanner::new(ExclusionLists {
        non_prose: vec!["utilities".to_string()],
        auto_generated: vec![],
    });
    let dirs = vec![PathBuf::from(SITE).join("_data/programs")];
    let outcome = scanner.scan(&dirs).unwrap();

    // categories and external-resources are scored once no longer excluded
    assert!(outcome.results.iter().any(|r| r.collection == "categories"));
    assert!(outcome
        .results
        .iter()
        .any(|r| r.name == "Statewide Benefits Directory"));
    assert!(outcome.results.iter().all(|r| r.collection != "utilities"));
}

#[test]
fn missing_data_dir_is_recorded_not_fatal() {
    let config = load_config(Path::new(SITE), None).unwrap();
    let scanner = CorpusScanner::from_config(&config).unwrap();
    let dirs = vec![
        PathBuf::from(SITE).join("_data/programs"),
        PathBuf::from(SITE).join("_data/does-not-exist"),
    ];
    let outcome = scanner.scan(&dirs).unwrap();
    assert_eq!(outcome.missing_dirs.len(), 1);
    assert_eq!(outcome.results.len(), 9);
}

#[test]
fn scan_is_idempotent() {
    let first = site_report();
    let second = site_report();
    assert_eq!(first.results, second.results);
}
