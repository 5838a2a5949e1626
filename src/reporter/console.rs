//! Console reporter with colored output

use crate::analyzer::scoring::GradeCalculator;
use crate::analyzer::ReadabilityReport;
use crate::maintenance::{CoordinateMigration, StampSummary};
use crate::{GradeBand, ScoreResult, HARD_GRADE};
use colored::Colorize;
use std::collections::BTreeMap;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a full readability run
    pub fn report(&self, report: &ReadabilityReport) {
        self.print_header(report);
        self.print_counts(report);
        self.print_top(report);

        if self.verbose {
            self.print_collections(report);
        }

        println!(
            "   {}",
            "Readability findings are advisory and never block a build.".dimmed()
        );
        println!();
    }

    /// One summary line
    pub fn report_quiet(&self, report: &ReadabilityReport) {
        println!(
            "{} eligible, {} above grade 8, {} above grade 10 ({:.1}%), {} above grade 12",
            report.eligible,
            report.above_grade_8,
            report.above_grade_10,
            report.percent_above_grade_10,
            report.above_grade_12
        );
    }

    fn print_header(&self, report: &ReadabilityReport) {
        println!();
        println!("{}", "📖 Description Readability (Flesch-Kincaid)".bold());
        println!(
            "   Collections: {} scanned, {} excluded | Synced records skipped: {}",
            report.collections_scanned,
            report.excluded_collections.len(),
            report.skipped_synced
        );
        if self.verbose {
            for excluded in &report.excluded_collections {
                println!(
                    "   {} {} ({})",
                    "·".dimmed(),
                    excluded.name,
                    excluded.reason.to_string().dimmed()
                );
            }
        }
        println!();
    }

    fn print_counts(&self, report: &ReadabilityReport) {
        println!("   {}", "Summary:".bold());
        println!("   Eligible descriptions: {}", report.eligible.to_string().bold());
        println!(
            "   Above grade 8:         {}",
            self.colorize_count(report.above_grade_8, GradeBand::FairlyDifficult)
        );
        println!(
            "   Above grade 10:        {}",
            self.colorize_count(report.above_grade_10, GradeBand::Difficult)
        );
        println!(
            "   Above grade 12:        {}",
            self.colorize_count(report.above_grade_12, GradeBand::VeryDifficult)
        );

        let percent = format!("{:.1}%", report.percent_above_grade_10);
        let percent = if !self.use_colors {
            percent.normal()
        } else if report.percent_above_grade_10 > 0.0 {
            percent.yellow()
        } else {
            percent.green()
        };
        println!("   Share above grade {}:  {}", HARD_GRADE, percent);
        println!();
    }

    fn print_top(&self, report: &ReadabilityReport) {
        if report.top.is_empty() {
            println!("   {}", "No eligible descriptions found.".dimmed());
            println!();
            return;
        }

        println!(
            "   {}",
            format!("Hardest {} descriptions:", report.top.len()).bold()
        );
        for (i, result) in report.top.iter().enumerate() {
            self.print_result(i + 1, result);
        }
        println!();
    }

    fn print_result(&self, rank: usize, result: &ScoreResult) {
        println!(
            "   {:>3}. {} {} {} {}",
            rank,
            self.colorize_grade(result.grade, result.band),
            self.colorize_band(result.band),
            format!("[{}]", result.collection).dimmed(),
            result.name
        );
        if self.verbose {
            let detail = match result.statistics {
                Some(stats) => format!(
                    "{} sentences, {} words, {} syllables, {} chars",
                    stats.sentences, stats.words, stats.syllables, result.description_length
                ),
                None => "no description".to_string(),
            };
            println!("        {} {}", "↳".dimmed(), detail.dimmed());
            println!(
                "        {} {}",
                "↳".dimmed(),
                GradeCalculator::band_description(result.band).dimmed()
            );
        }
    }

    fn print_collections(&self, report: &ReadabilityReport) {
        let mut by_collection: BTreeMap<&str, Vec<&ScoreResult>> = BTreeMap::new();
        for result in &report.results {
            by_collection
                .entry(result.collection.as_str())
                .or_default()
                .push(result);
        }
        if by_collection.is_empty() {
            return;
        }

        println!("   {}", "By collection:".bold());
        for (collection, results) in by_collection {
            let average = results.iter().map(|r| r.grade).sum::<f64>() / results.len() as f64;
            println!(
                "   {} ({} records, average grade {:.1})",
                collection.bold(),
                results.len(),
                average
            );
            for result in results {
                println!(
                    "      {} {}",
                    self.colorize_grade(result.grade, result.band),
                    result.name
                );
            }
        }
        println!();
    }

    /// Report the outcome of a `verified_date` pass
    pub fn report_stamp(&self, summary: &StampSummary) {
        println!();
        println!("{}", "🗓  Verification Dates".bold());
        for stamped in &summary.stamped {
            println!(
                "   {} {} {} → {}",
                self.mark("✓"),
                format!("[{}]", stamped.collection).dimmed(),
                stamped.name,
                stamped.verified_date
            );
        }
        println!(
            "   Stamped: {} | Already current: {} | Files {}: {}",
            summary.stamped.len().to_string().bold(),
            summary.already_current,
            self.file_verb(summary.files.dry_run),
            summary.files.files_changed.len()
        );
        if !summary.unmatched.is_empty() {
            println!(
                "   {} {} listed id(s) matched no record: {}",
                self.warn_mark(),
                summary.unmatched.len(),
                summary.unmatched.join(", ")
            );
        }
        self.print_dry_run_note(summary.files.dry_run);
        println!();
    }

    /// Report the outcome of the coordinate migration
    pub fn report_migration(&self, migration: &CoordinateMigration) {
        println!();
        println!("{}", "📍 Coordinate Migration".bold());
        for migrated in &migration.migrated {
            println!(
                "   {} {} {} → {}, {}",
                self.mark("✓"),
                format!("[{}]", migrated.collection).dimmed(),
                migrated.name,
                migrated.coordinates.latitude,
                migrated.coordinates.longitude
            );
        }
        println!(
            "   Migrated: {} | Needs review: {} | Files {}: {}",
            migration.migrated.len().to_string().bold(),
            migration.unresolved.len(),
            self.file_verb(migration.files.dry_run),
            migration.files.files_changed.len()
        );

        if !migration.unresolved.is_empty() {
            println!();
            println!("   {}", "Manual review:".bold());
            for unresolved in &migration.unresolved {
                println!(
                    "   {} {} {}: {}",
                    self.warn_mark(),
                    format!("[{}]", unresolved.collection).dimmed(),
                    unresolved.name,
                    unresolved.reason
                );
                if let Some(ref link) = unresolved.map_link {
                    println!("       {} {}", "→".dimmed(), link.italic());
                }
            }
        }
        self.print_dry_run_note(migration.files.dry_run);
        println!();
    }

    fn print_dry_run_note(&self, dry_run: bool) {
        if dry_run {
            println!("   {}", "Dry run: no files were written.".dimmed());
        }
    }

    fn file_verb(&self, dry_run: bool) -> &'static str {
        if dry_run {
            "to update"
        } else {
            "updated"
        }
    }

    fn mark(&self, s: &str) -> colored::ColoredString {
        if self.use_colors {
            s.green()
        } else {
            s.normal()
        }
    }

    fn warn_mark(&self) -> colored::ColoredString {
        if self.use_colors {
            "⚠".yellow()
        } else {
            "⚠".normal()
        }
    }

    fn colorize_count(&self, count: usize, band: GradeBand) -> colored::ColoredString {
        let s = count.to_string();
        if !self.use_colors || count == 0 {
            return s.normal();
        }
        match band {
            GradeBand::VeryDifficult => s.red().bold(),
            GradeBand::Difficult => s.red(),
            _ => s.yellow(),
        }
    }

    fn colorize_grade(&self, grade: f64, band: GradeBand) -> colored::ColoredString {
        let s = format!("{:>5.1}", grade);
        if !self.use_colors {
            return s.normal();
        }
        match band {
            GradeBand::Easy => s.green().bold(),
            GradeBand::Standard => s.green(),
            GradeBand::FairlyDifficult => s.yellow(),
            GradeBand::Difficult => s.red(),
            GradeBand::VeryDifficult => s.red().bold(),
        }
    }

    fn colorize_band(&self, band: GradeBand) -> colored::ColoredString {
        let s = format!("{:<16}", band.to_string());
        if !self.use_colors {
            return s.normal();
        }
        match band {
            GradeBand::Easy | GradeBand::Standard => s.green(),
            GradeBand::FairlyDifficult => s.yellow(),
            GradeBand::Difficult | GradeBand::VeryDifficult => s.red(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
