use std::fmt::Write;

use crate::error::Result;
use crate::priority::remediation_guidance;
use crate::rules::Violation;

use super::{AnalysisReport, OutputFormatter};

const HTML_HEADER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Apex Guard Report</title>
    <style>
        :root {
            --color-critical: #ef4444;
            --color-important: #eab308;
            --color-cleanup: #3b82f6;
            --color-fixed: #22c55e;
            --color-bg: #f8fafc;
            --color-card: #ffffff;
            --color-border: #e2e8f0;
            --color-text: #1e293b;
            --color-text-muted: #64748b;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
            background: var(--color-bg);
            color: var(--color-text);
            line-height: 1.6;
            padding: 2rem;
        }
        .container { max-width: 1200px; margin: 0 auto; }
        h1 { font-size: 1.875rem; font-weight: 700; margin-bottom: 1.5rem; }
        h2 { font-size: 1.25rem; font-weight: 600; margin: 1.5rem 0 1rem; }
        .summary-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
        .summary-card { background: var(--color-card); border-radius: 0.5rem; padding: 1.25rem; border: 1px solid var(--color-border); text-align: center; }
        .summary-card .value { font-size: 2rem; font-weight: 700; display: block; }
        .summary-card .label { font-size: 0.875rem; color: var(--color-text-muted); margin-top: 0.25rem; }
        .summary-card.fixed .value { color: var(--color-fixed); }
        .summary-card.remaining .value { color: var(--color-critical); }
        .issue { background: var(--color-card); border-radius: 0.375rem; border: 1px solid var(--color-border); padding: 0.75rem 1rem; margin-bottom: 0.75rem; }
        .issue.fixed { border-left: 4px solid var(--color-fixed); }
        .issue.manual { border-left: 4px solid var(--color-important); }
        .issue .meta { font-size: 0.8125rem; color: var(--color-text-muted); }
        .issue pre { background: #0f172a; color: #f8fafc; padding: 0.625rem; border-radius: 0.25rem; overflow-x: auto; margin: 0.5rem 0; font-size: 0.8125rem; }
        .issue em { font-size: 0.8125rem; color: var(--color-text-muted); }
        table { width: 100%; border-collapse: collapse; background: var(--color-card); border-radius: 0.5rem; overflow: hidden; border: 1px solid var(--color-border); }
        th, td { padding: 0.75rem 1rem; text-align: left; border-bottom: 1px solid var(--color-border); }
        th { background: var(--color-bg); font-weight: 600; font-size: 0.875rem; color: var(--color-text-muted); text-transform: uppercase; letter-spacing: 0.05em; }
        td { font-size: 0.875rem; }
        td.number { text-align: right; font-variant-numeric: tabular-nums; }
        tr:last-child td { border-bottom: none; }
        .file-path { font-family: 'SF Mono', SFMono-Regular, Consolas, 'Liberation Mono', Menlo, monospace; font-size: 0.8125rem; word-break: break-all; }
        .footer { margin-top: 2rem; padding-top: 1rem; border-top: 1px solid var(--color-border); font-size: 0.75rem; color: var(--color-text-muted); text-align: center; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Apex Guard Report</h1>
"#;

const HTML_FOOTER: &str = r#"        <div class="footer">
            Generated by <strong>apex-guard</strong>
        </div>
    </div>
</body>
</html>
"#;

pub struct HtmlFormatter;

impl HtmlFormatter {
    fn write_summary(report: &AnalysisReport<'_>, out: &mut String) {
        let scan = report.scan;
        let fixed_count = report.fix.map_or(0, crate::fixer::FixReport::fixed_count);
        let remaining = scan.total_violations().saturating_sub(fixed_count);
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        let _ = writeln!(out, r#"        <p class="meta">Generated: {generated}</p>"#);
        out.push_str("        <div class=\"summary-grid\">\n");
        let cards = [
            ("", scan.files_scanned, "Files Scanned"),
            ("", scan.total_violations(), "Total Violations"),
            (" fixed", fixed_count, "Auto-Fixed"),
            (" remaining", remaining, "Remaining"),
        ];
        for (class, value, label) in cards {
            let _ = writeln!(
                out,
                r#"            <div class="summary-card{class}"><span class="value">{value}</span><span class="label">{label}</span></div>"#
            );
        }
        out.push_str("        </div>\n");
    }

    fn write_fixed_issues(report: &AnalysisReport<'_>, out: &mut String) {
        out.push_str("        <h2>Auto-Fixed Issues</h2>\n");

        let Some(fix) = report.fix.filter(|f| !f.fixed.is_empty()) else {
            out.push_str("        <p>No issues were automatically fixed.</p>\n");
            return;
        };

        for entry in &fix.fixed {
            let v = &entry.violation;
            let _ = writeln!(
                out,
                r#"        <div class="issue fixed"><strong>{}</strong> <span class="meta">{}:{}</span><br>{}<pre>{}</pre><em>Fix: {}</em></div>"#,
                v.rule,
                html_escape(&v.file_path.display().to_string()),
                v.line,
                html_escape(&v.description),
                html_escape(&v.context.snippet),
                html_escape(&entry.description)
            );
        }
    }

    fn write_manual_issues(report: &AnalysisReport<'_>, out: &mut String) {
        out.push_str("        <h2>Manual Action Required</h2>\n");

        let fixed_lines: Vec<(&std::path::PathBuf, usize)> = report.fix.map_or_else(Vec::new, |f| {
            f.fixed
                .iter()
                .map(|e| (&e.violation.file_path, e.violation.line))
                .collect()
        });

        let manual: Vec<&Violation> = report
            .scan
            .violations
            .iter()
            .filter(|v| !fixed_lines.contains(&(&v.file_path, v.line)))
            .collect();

        if manual.is_empty() {
            out.push_str("        <p>All detected issues have been resolved.</p>\n");
            return;
        }

        for v in manual {
            let _ = writeln!(
                out,
                r#"        <div class="issue manual"><strong>{}</strong> ({}) <span class="meta">{}:{}</span><br>{}<pre>{}</pre><em>Action: {}</em></div>"#,
                v.rule,
                v.severity,
                html_escape(&v.file_path.display().to_string()),
                v.line,
                html_escape(&v.description),
                html_escape(&v.context.snippet),
                html_escape(remediation_guidance(v.rule))
            );
        }
    }

    fn write_file_table(report: &AnalysisReport<'_>, out: &mut String) {
        out.push_str("        <h2>File Summary</h2>\n");
        out.push_str(
            "        <table><thead><tr><th>File</th><th>Fixed</th><th>Remaining</th><th>Total</th></tr></thead><tbody>\n",
        );

        for (path, violations) in report.scan.by_file() {
            let fixed = report.fix.map_or(0, |f| {
                f.fixed
                    .iter()
                    .filter(|e| e.violation.file_path == path)
                    .count()
            });
            let total = violations.len();
            let _ = writeln!(
                out,
                r#"            <tr><td class="file-path">{}</td><td class="number">{fixed}</td><td class="number">{}</td><td class="number">{total}</td></tr>"#,
                html_escape(&path.display().to_string()),
                total.saturating_sub(fixed)
            );
        }

        out.push_str("        </tbody></table>\n");
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format(&self, report: &AnalysisReport<'_>) -> Result<String> {
        let mut out = String::from(HTML_HEADER);

        Self::write_summary(report, &mut out);
        Self::write_fixed_issues(report, &mut out);
        Self::write_manual_issues(report, &mut out);
        Self::write_file_table(report, &mut out);

        out.push_str(HTML_FOOTER);
        Ok(out)
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
#[path = "html_tests.rs"]
mod tests;
