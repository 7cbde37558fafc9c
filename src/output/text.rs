use std::fmt::Write;

use crate::error::Result;
use crate::priority::{RuleGroup, Tier, TierReport};
use crate::rules::Severity;

use super::{AnalysisReport, OutputFormatter};

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if stdout is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// ANSI color codes
mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

pub struct TextFormatter {
    use_colors: bool,
    verbose: u8,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self::with_verbose(mode, 0)
    }

    #[must_use]
    pub fn with_verbose(mode: ColorMode, verbose: u8) -> Self {
        Self {
            use_colors: Self::should_use_colors(mode),
            verbose,
        }
    }

    fn should_use_colors(mode: ColorMode) -> bool {
        match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                // Respect NO_COLOR environment variable
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{}", ansi::RESET)
        } else {
            text.to_string()
        }
    }

    const fn tier_color(tier: Tier) -> &'static str {
        match tier {
            Tier::Critical => ansi::RED,
            Tier::Important => ansi::YELLOW,
            Tier::Cleanup => ansi::CYAN,
        }
    }

    const fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Critical | Severity::High => ansi::RED,
            Severity::Moderate => ansi::YELLOW,
            Severity::Low | Severity::Info => ansi::CYAN,
        }
    }

    fn format_summary(&self, report: &AnalysisReport<'_>, out: &mut String) {
        let scan = report.scan;
        let _ = writeln!(out, "{}", self.paint("=== Apex Guard Report ===", ansi::BOLD));
        let _ = writeln!(out, "Files scanned:     {}", scan.files_scanned);
        let _ = writeln!(out, "Total violations:  {}", scan.total_violations());

        let summary = &report.prioritized.summary;
        let _ = writeln!(
            out,
            "Findings:          {} across {} occurrence(s)",
            summary.total_findings, summary.total_occurrences
        );
        let _ = writeln!(out);
    }

    fn format_tier(&self, tier_report: &TierReport, out: &mut String) {
        if tier_report.rule_groups.is_empty() {
            return;
        }

        let heading = format!(
            "[{}] {}",
            tier_report.tier.as_str(),
            tier_report.rationale
        );
        let _ = writeln!(
            out,
            "{}",
            self.paint(&heading, Self::tier_color(tier_report.tier))
        );

        for group in &tier_report.rule_groups {
            self.format_rule_group(group, out);
        }
        let _ = writeln!(out);
    }

    fn format_rule_group(&self, group: &RuleGroup, out: &mut String) {
        let _ = writeln!(
            out,
            "  {}: {} finding(s) / {} occurrence(s)",
            group.rule,
            group.file_count,
            group.occurrences
        );

        if self.verbose > 0 {
            for file in &group.files {
                let _ = writeln!(
                    out,
                    "    {} ({} occurrence(s))",
                    file.path.display(),
                    file.occurrences
                );
                if self.verbose > 1 {
                    for v in &file.sample {
                        let severity =
                            self.paint(v.severity.as_str(), Self::severity_color(v.severity));
                        let _ = writeln!(
                            out,
                            "      {}:{} [{severity}] {}",
                            v.line, v.column, v.description
                        );
                    }
                }
            }
            let _ = writeln!(out, "    -> {}", group.guidance);
        }
    }

    fn format_fixes(&self, report: &AnalysisReport<'_>, out: &mut String) {
        let Some(fix) = report.fix else { return };

        let _ = writeln!(out, "{}", self.paint("=== Auto-Fix ===", ansi::BOLD));
        let fixed = self.paint(&fix.fixed_count().to_string(), ansi::GREEN);
        let failed = self.paint(&fix.failed_count().to_string(), ansi::RED);
        let _ = writeln!(
            out,
            "Fixed: {fixed}  Failed: {failed}  Files updated: {}",
            fix.updated_files.len()
        );

        for entry in &fix.fixed {
            let _ = writeln!(
                out,
                "  {} {}:{} - {}",
                self.paint("FIXED", ansi::GREEN),
                entry.violation.file_path.display(),
                entry.violation.line,
                entry.description
            );
        }
        for entry in &fix.failed {
            let _ = writeln!(
                out,
                "  {} {}:{} [{}] - {}",
                self.paint("FAILED", ansi::RED),
                entry.violation.file_path.display(),
                entry.violation.line,
                entry.violation.rule,
                entry.reason
            );
        }
        let _ = writeln!(out);
    }

    fn format_verification(&self, report: &AnalysisReport<'_>, out: &mut String) {
        let Some(verify) = report.verify else { return };

        let _ = writeln!(out, "{}", self.paint("=== Verification ===", ansi::BOLD));
        let _ = writeln!(
            out,
            "Verified: {}  New violations: {}  Rollbacks: {}",
            verify.verified.len(),
            verify.new_violations.len(),
            verify.rollbacks.len()
        );

        for rollback in &verify.rollbacks {
            let _ = writeln!(
                out,
                "  {} {} - {}",
                self.paint("ROLLED BACK", ansi::YELLOW),
                rollback.file_path.display(),
                rollback.reason
            );
        }
        let _ = writeln!(out);
    }

    fn format_warnings(&self, report: &AnalysisReport<'_>, out: &mut String) {
        let mut warnings: Vec<&String> = report.scan.warnings.iter().collect();
        if let Some(fix) = report.fix {
            warnings.extend(&fix.warnings);
        }
        if let Some(verify) = report.verify {
            warnings.extend(&verify.warnings);
        }

        if warnings.is_empty() {
            return;
        }

        let _ = writeln!(out, "{}", self.paint("=== Warnings ===", ansi::BOLD));
        for warning in warnings {
            let _ = writeln!(out, "  {}", self.paint(warning, ansi::YELLOW));
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &AnalysisReport<'_>) -> Result<String> {
        let mut out = String::new();

        self.format_summary(report, &mut out);
        for tier_report in report.prioritized.tiers.values() {
            self.format_tier(tier_report, &mut out);
        }
        self.format_fixes(report, &mut out);
        self.format_verification(report, &mut out);
        self.format_warnings(report, &mut out);

        Ok(out)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
