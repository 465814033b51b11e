//! Output types for the field cross-validator (§4.7).

use serde::{Deserialize, Serialize};

/// Closed issue-severity vocabulary (§9 "Closed variant sets").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
    Info,
}

impl IssueSeverity {
    /// Score deduction for one issue of this severity (§4.7).
    pub fn deduction(&self) -> i32 {
        match self {
            IssueSeverity::Error => 20,
            IssueSeverity::Warning => 5,
            IssueSeverity::Info => 0,
        }
    }
}

/// One flagged problem with a populated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub code: String,
    pub severity: IssueSeverity,
    pub message: String,
    pub details: Option<String>,
}

impl FieldIssue {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        severity: IssueSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            severity,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// The full cross-validation report, score clamped at 0 (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationReport {
    pub issues: Vec<FieldIssue>,
    pub score: i32,
}

impl ValidationReport {
    pub fn from_issues(issues: Vec<FieldIssue>) -> Self {
        let deducted: i32 = issues.iter().map(|i| i.severity.deduction()).sum();
        let score = (100 - deducted).max(0);
        Self { issues, score }
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
