//! Readgrade: readability scoring for a discount-program directory
//!
//! This library estimates the Flesch-Kincaid grade level of every program
//! description in the site's YAML data files, ranks the results, and carries the
//! small maintenance passes (verification dates, coordinate migration) that work
//! over the same collections.

pub mod analyzer;
pub mod collection;
pub mod config;
pub mod maintenance;
pub mod reporter;

use serde::{Deserialize, Serialize};

/// Grade above which a description draws a warning
pub const WARN_GRADE: f64 = 8.0;
/// Grade above which a description counts as hard to read
pub const HARD_GRADE: f64 = 10.0;
/// Grade above which a description draws an error
pub const ERROR_GRADE: f64 = 12.0;
/// Default length of the ranked list in a report
pub const DEFAULT_TOP: usize = 20;

/// Readability score for one record description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Collection (file stem) the record came from
    pub collection: String,
    /// Record name
    pub name: String,
    /// Description length in characters (0 when missing)
    pub description_length: usize,
    /// Flesch-Kincaid grade, rounded to one decimal place
    pub grade: f64,
    /// Qualitative band for the grade
    pub band: GradeBand,
    /// Counts behind the grade; absent for empty descriptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<analyzer::TextStatistics>,
}

impl ScoreResult {
    pub fn new(collection: &str, name: &str, description: Option<&str>) -> Self {
        let statistics = description.and_then(analyzer::TextStatistics::from_text);
        let grade = statistics
            .as_ref()
            .map(analyzer::GradeCalculator::grade_statistics)
            .unwrap_or(0.0);
        Self {
            collection: collection.to_string(),
            name: name.to_string(),
            description_length: description.map(|d| d.chars().count()).unwrap_or(0),
            grade,
            band: GradeBand::from_grade(grade),
            statistics,
        }
    }
}

/// Reading-difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradeBand {
    Easy,
    Standard,
    FairlyDifficult,
    Difficult,
    VeryDifficult,
}

impl GradeBand {
    pub fn from_grade(grade: f64) -> Self {
        if grade <= 5.0 {
            GradeBand::Easy
        } else if grade <= 8.0 {
            GradeBand::Standard
        } else if grade <= 10.0 {
            GradeBand::FairlyDifficult
        } else if grade <= 12.0 {
            GradeBand::Difficult
        } else {
            GradeBand::VeryDifficult
        }
    }

    /// Reader level the band corresponds to
    pub fn audience(self) -> &'static str {
        match self {
            GradeBand::Easy => "5th grade or below",
            GradeBand::Standard => "6th-8th grade",
            GradeBand::FairlyDifficult => "9th-10th grade",
            GradeBand::Difficult => "11th-12th grade",
            GradeBand::VeryDifficult => "College level",
        }
    }
}

impl std::fmt::Display for GradeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeBand::Easy => write!(f, "Easy"),
            GradeBand::Standard => write!(f, "Standard"),
            GradeBand::FairlyDifficult => write!(f, "Fairly Difficult"),
            GradeBand::Difficult => write!(f, "Difficult"),
            GradeBand::VeryDifficult => write!(f, "Very Difficult"),
        }
    }
}

/// Public API: score every eligible record under the configured data directories.
///
/// * `work_dir` - directory to start the config search from
/// * `config_path` - optional explicit config file
pub fn score_site(
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<analyzer::ReadabilityReport> {
    let config = config::load_config(work_dir, config_path)?;
    let scanner = analyzer::CorpusScanner::from_config(&config)?;
    let dirs = config.resolve_data_dirs(work_dir);
    let outcome = scanner.scan(&dirs)?;
    Ok(analyzer::ReadabilityReport::build(&outcome, config.top()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds_are_inclusive_upper_bounds() {
        assert_eq!(GradeBand::from_grade(0.0), GradeBand::Easy);
        assert_eq!(GradeBand::from_grade(5.0), GradeBand::Easy);
        assert_eq!(GradeBand::from_grade(5.1), GradeBand::Standard);
        assert_eq!(GradeBand::from_grade(8.0), GradeBand::Standard);
        assert_eq!(GradeBand::from_grade(8.1), GradeBand::FairlyDifficult);
        assert_eq!(GradeBand::from_grade(10.0), GradeBand::FairlyDifficult);
        assert_eq!(GradeBand::from_grade(10.1), GradeBand::Difficult);
        assert_eq!(GradeBand::from_grade(12.0), GradeBand::Difficult);
        assert_eq!(GradeBand::from_grade(12.1), GradeBand::VeryDifficult);
        assert_eq!(GradeBand::from_grade(40.0), GradeBand::VeryDifficult);
    }

    #[test]
    fn test_band_display_and_audience() {
        assert_eq!(GradeBand::FairlyDifficult.to_string(), "Fairly Difficult");
        assert_eq!(GradeBand::VeryDifficult.audience(), "College level");
        assert_eq!(GradeBand::Easy.audience(), "5th grade or below");
    }

    #[test]
    fn test_missing_description_scores_zero_and_easy() {
        let result = ScoreResult::new("food", "Pantry Locator", None);
        assert_eq!(result.grade, 0.0);
        assert_eq!(result.band, GradeBand::Easy);
        assert_eq!(result.description_length, 0);
        assert!(result.statistics.is_none());
    }

    #[test]
    fn test_score_result_counts_characters() {
        let result = ScoreResult::new("food", "Card", Some("The cat sat."));
        assert_eq!(result.description_length, 12);
        assert_eq!(result.grade, 0.0);
        let stats = result.statistics.unwrap();
        assert_eq!((stats.sentences, stats.words, stats.syllables), (1, 3, 3));
    }
}
