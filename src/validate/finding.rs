//! Structured constraint findings.

use std::sync::Arc;

use smol_str::SmolStr;
use uuid::Uuid;

use crate::base::{Lexeme, SourceFile, SourceLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingSeverity {
    Error,
    Warning,
    Info,
}

/// Where a finding points: the reporting validator plus a source span.
#[derive(Debug, Clone, PartialEq)]
pub struct FindingLocation {
    pub validator: String,
    pub source: Arc<SourceFile>,
    pub location: SourceLocation,
}

impl FindingLocation {
    pub fn new(
        validator: impl Into<String>,
        source: Arc<SourceFile>,
        location: SourceLocation,
    ) -> Self {
        Self {
            validator: validator.into(),
            source,
            location,
        }
    }

    pub fn from_lexeme(validator: impl Into<String>, lexeme: &Lexeme) -> Self {
        Self::new(validator, Arc::clone(&lexeme.source), lexeme.location)
    }
}

/// One outcome of one constraint against one definition.
#[derive(Debug, Clone)]
pub struct ValidatorFinding {
    pub definition_uid: Uuid,
    pub definition_name: SmolStr,
    pub severity: FindingSeverity,
    pub message: String,
    pub location: FindingLocation,
}

/// A collection of findings with bucketed retrieval.
#[derive(Debug, Clone, Default)]
pub struct ValidatorFindings {
    findings: Vec<ValidatorFinding>,
}

impl ValidatorFindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, finding: ValidatorFinding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, other: ValidatorFindings) {
        self.findings.extend(other.findings);
    }

    pub fn all(&self) -> &[ValidatorFinding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn errors(&self) -> Vec<&ValidatorFinding> {
        self.by_severity(FindingSeverity::Error)
    }

    pub fn warnings(&self) -> Vec<&ValidatorFinding> {
        self.by_severity(FindingSeverity::Warning)
    }

    pub fn infos(&self) -> Vec<&ValidatorFinding> {
        self.by_severity(FindingSeverity::Info)
    }

    fn by_severity(&self, severity: FindingSeverity) -> Vec<&ValidatorFinding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .collect()
    }
}
