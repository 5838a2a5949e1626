//! Flesch-Kincaid grade level calculation

use super::normalizer::normalize;
use super::syllables;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const WORDS_PER_SENTENCE_WEIGHT: f64 = 0.39;
const SYLLABLES_PER_WORD_WEIGHT: f64 = 11.8;
const GRADE_OFFSET: f64 = 15.59;

fn sentence_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").unwrap())
}

/// Counts the grade is computed from. Sentence and word counts are floored at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStatistics {
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
}

impl TextStatistics {
    /// Count sentences, words, and syllables. None when there is no text left after
    /// normalization.
    pub fn from_text(text: &str) -> Option<Self> {
        let cleaned = normalize(text);
        if cleaned.trim().is_empty() {
            return None;
        }

        let sentences = sentence_breaks()
            .split(&cleaned)
            .filter(|s| !s.trim().is_empty())
            .count();

        let words: Vec<&str> = cleaned
            .split_whitespace()
            .filter(|w| w.bytes().any(|b| b.is_ascii_alphabetic()))
            .collect();
        let syllables = words.iter().map(|w| syllables::estimate(w)).sum();

        Some(Self {
            sentences: sentences.max(1),
            words: words.len().max(1),
            syllables,
        })
    }

    /// Unclamped, unrounded grade
    pub fn raw_grade(&self) -> f64 {
        let words_per_sentence = self.words as f64 / self.sentences as f64;
        let syllables_per_word = self.syllables as f64 / self.words as f64;
        WORDS_PER_SENTENCE_WEIGHT * words_per_sentence
            + SYLLABLES_PER_WORD_WEIGHT * syllables_per_word
            - GRADE_OFFSET
    }
}

/// Calculator for readability grades
pub struct GradeCalculator;

impl GradeCalculator {
    /// Grade level of `text`: clamped at 0 and rounded to one decimal place
    pub fn grade(text: &str) -> f64 {
        TextStatistics::from_text(text)
            .map(|stats| Self::grade_statistics(&stats))
            .unwrap_or(0.0)
    }

    /// Grade level for counts already taken
    pub fn grade_statistics(stats: &TextStatistics) -> f64 {
        let clamped = stats.raw_grade().max(0.0);
        (clamped * 10.0).round() / 10.0
    }

    /// Get a description of the band a grade falls in
    pub fn band_description(band: crate::GradeBand) -> &'static str {
        use crate::GradeBand;
        match band {
            GradeBand::Easy => "Easy - readable by nearly everyone",
            GradeBand::Standard => "Standard - plain language target for public information",
            GradeBand::FairlyDifficult => "Fairly Difficult - consider shorter sentences",
            GradeBand::Difficult => "Difficult - simplify wording and split long sentences",
            GradeBand::VeryDifficult => "Very Difficult - rewrite in plain language",
        }
    }
}
