mod html;
mod json;
mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use text::{ColorMode, TextFormatter};

use crate::error::Result;
use crate::fixer::FixReport;
use crate::priority::PrioritizedResult;
use crate::scanner::ScanResult;
use crate::verifier::VerifyReport;

/// Everything the reporting layer needs about one pipeline run. Fix and
/// verification sections are absent for scan-only runs.
pub struct AnalysisReport<'a> {
    pub scan: &'a ScanResult,
    pub prioritized: &'a PrioritizedResult,
    pub fix: Option<&'a FixReport>,
    pub verify: Option<&'a VerifyReport>,
}

/// Trait for formatting an analysis report into an output document.
pub trait OutputFormatter {
    /// Format the report into a string.
    ///
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format(&self, report: &AnalysisReport<'_>) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
