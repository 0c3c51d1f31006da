//! Aggregated validation outcomes.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::Lexeme;
use crate::execute::{ExecutionMessage, ExecutionResult, ExecutionStatus, MessageLevel};
use crate::lang::Definition;

use super::finding::{
    FindingLocation, FindingSeverity, ValidatorFinding, ValidatorFindings,
};

/// The outcome of validating one definition or a whole context.
#[derive(Debug, Clone)]
pub struct ValidatorResult {
    /// The definition under test; empty for context-wide results.
    pub definition_name: SmolStr,
    pub findings: ValidatorFindings,
    status_override: Option<ExecutionStatus>,
}

impl ValidatorResult {
    pub fn new(definition_name: impl Into<SmolStr>) -> Self {
        Self {
            definition_name: definition_name.into(),
            findings: ValidatorFindings::new(),
            status_override: None,
        }
    }

    /// Record a finding pinned to a lexeme of the owning definition.
    pub fn add_finding(
        &mut self,
        definition: &Definition,
        severity: FindingSeverity,
        message: impl Into<String>,
        validator: &str,
        lexeme: Option<&Lexeme>,
    ) {
        let location = match lexeme.or_else(|| definition.name_lexeme()) {
            Some(lexeme) => FindingLocation::from_lexeme(validator, lexeme),
            None => FindingLocation::new(
                validator,
                Arc::clone(&definition.source),
                crate::base::SourceLocation::default(),
            ),
        };
        self.findings.add(ValidatorFinding {
            definition_uid: definition.uid(),
            definition_name: definition.name.clone(),
            severity,
            message: message.into(),
            location,
        });
    }

    /// No Error-severity findings and no overriding failure status.
    pub fn is_valid(&self) -> bool {
        self.findings.errors().is_empty() && self.status_override.is_none()
    }

    /// Force a status regardless of findings (cancellation, plugin failure).
    pub fn set_status(&mut self, status: ExecutionStatus) {
        self.status_override = Some(status);
    }

    pub fn status(&self) -> ExecutionStatus {
        if let Some(status) = self.status_override {
            return status;
        }
        if !self.findings.errors().is_empty() {
            ExecutionStatus::ConstraintFailure
        } else if !self.findings.warnings().is_empty() {
            ExecutionStatus::ConstraintWarning
        } else {
            ExecutionStatus::Success
        }
    }

    /// Fold another result's findings into this one; the more severe
    /// override wins.
    pub fn merge(&mut self, other: ValidatorResult) {
        self.findings.extend(other.findings);
        if let Some(status) = other.status_override {
            let keep = self
                .status_override
                .is_some_and(|current| current.exit_code() >= status.exit_code());
            if !keep {
                self.status_override = Some(status);
            }
        }
    }

    /// Render this result as an [`ExecutionResult`] for CLI embedding.
    pub fn to_execution_result(
        &self,
        plugin_name: impl Into<String>,
        command_name: impl Into<String>,
    ) -> ExecutionResult {
        let messages = self
            .findings
            .all()
            .iter()
            .map(|finding| {
                let level = match finding.severity {
                    FindingSeverity::Error => MessageLevel::Error,
                    FindingSeverity::Warning => MessageLevel::Warning,
                    FindingSeverity::Info => MessageLevel::Info,
                };
                ExecutionMessage::new(
                    finding.message.clone(),
                    level,
                    Some(Arc::clone(&finding.location.source)),
                    Some(finding.location.location),
                )
            })
            .collect();
        ExecutionResult::new(plugin_name, command_name, self.status(), messages)
    }
}
