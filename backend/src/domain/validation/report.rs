//! Accumulated outcome of a validation run.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Errors and warnings collected while auditing stored data.
///
/// The report is valid exactly when it holds no errors; warnings never make
/// it invalid.
///
/// # Examples
/// ```
/// use backend::domain::ValidationReport;
///
/// let mut report = ValidationReport::default();
/// report.warn("Collection menus is empty");
/// assert!(report.is_valid());
/// report.fail("users: 2 records missing required field 'email'");
/// assert!(!report.is_valid());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReportDto", into = "ReportDto")]
pub struct ValidationReport {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationReport {
    /// Record an error.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Whether the run produced no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in the order they were found.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Warnings in the order they were found.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Append another report's findings after this one's.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Emit the findings through `tracing`.
    pub fn log(&self, subject: &str) {
        if self.is_valid() {
            info!(subject, warnings = self.warnings.len(), "{subject} completed successfully");
        } else {
            let errors = self.errors.len();
            error!(subject, errors, "{subject} failed with {errors} errors");
            for message in &self.errors {
                error!(subject, "{message}");
            }
        }
        if !self.warnings.is_empty() {
            warn!(subject, "{} warnings found", self.warnings.len());
            for message in &self.warnings {
                warn!(subject, "{message}");
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportDto {
    #[serde(default)]
    is_valid: bool,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

impl From<ValidationReport> for ReportDto {
    fn from(report: ValidationReport) -> Self {
        Self {
            is_valid: report.is_valid(),
            errors: report.errors,
            warnings: report.warnings,
        }
    }
}

impl From<ReportDto> for ValidationReport {
    fn from(dto: ReportDto) -> Self {
        Self {
            errors: dto.errors,
            warnings: dto.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn merge_keeps_order() {
        let mut first = ValidationReport::default();
        first.fail("a");
        first.warn("w1");
        let mut second = ValidationReport::default();
        second.fail("b");
        second.warn("w2");

        first.merge(second);

        assert_eq!(first.errors(), ["a", "b"]);
        assert_eq!(first.warnings(), ["w1", "w2"]);
    }

    #[test]
    fn serialises_validity_flag() {
        let mut report = ValidationReport::default();
        report.warn("Collection menus is empty");
        assert_eq!(
            serde_json::to_value(&report).expect("serialises"),
            json!({"isValid": true, "errors": [], "warnings": ["Collection menus is empty"]})
        );
    }

    #[test]
    fn validity_is_derived_not_trusted() {
        let report: ValidationReport =
            serde_json::from_value(json!({"isValid": true, "errors": ["x"]})).expect("decodes");
        assert!(!report.is_valid());
    }
}
