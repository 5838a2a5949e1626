//! JSON reporter for machine-readable output

use crate::analyzer::ReadabilityReport;
use crate::maintenance::{CoordinateMigration, StampSummary};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a readability run as JSON
    pub fn report(&self, report: &ReadabilityReport) -> String {
        self.render(report)
    }

    pub fn report_stamp(&self, summary: &StampSummary) -> String {
        self.render(summary)
    }

    pub fn report_migration(&self, migration: &CoordinateMigration) -> String {
        self.render(migration)
    }

    fn render<T: Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}
