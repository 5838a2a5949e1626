//! Analyzer module - readability scoring engine

pub mod engine;
pub mod normalizer;
pub mod scoring;
pub mod summary;
pub mod syllables;

pub use engine::{CorpusScanner, ExclusionLists, ScanOutcome};
pub use scoring::{GradeCalculator, TextStatistics};
pub use summary::ReadabilityReport;
