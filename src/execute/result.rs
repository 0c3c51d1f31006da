//! Execution outcomes shared by commands and constraints.

use std::fmt;
use std::sync::Arc;

use crate::base::{SourceFile, SourceLocation};

/// The outcome class of an executed command or constraint, with the exit
/// code used when the engine is embedded in a CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    ConstraintFailure,
    ConstraintWarning,
    ParserFailure,
    PluginFailure,
    OperationCancelled,
    GeneralFailure,
}

impl ExecutionStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::ConstraintFailure => 1,
            Self::ConstraintWarning => 2,
            Self::ParserFailure => 3,
            Self::PluginFailure => 4,
            Self::OperationCancelled => 5,
            Self::GeneralFailure => 6,
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "Success",
            Self::ConstraintFailure => "ConstraintFailure",
            Self::ConstraintWarning => "ConstraintWarning",
            Self::ParserFailure => "ParserFailure",
            Self::PluginFailure => "PluginFailure",
            Self::OperationCancelled => "OperationCancelled",
            Self::GeneralFailure => "GeneralFailure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// One user-facing message, optionally pinned to a source location.
#[derive(Debug, Clone)]
pub struct ExecutionMessage {
    pub message: String,
    pub level: MessageLevel,
    pub source: Option<Arc<SourceFile>>,
    pub location: Option<SourceLocation>,
}

impl ExecutionMessage {
    pub fn new(
        message: impl Into<String>,
        level: MessageLevel,
        source: Option<Arc<SourceFile>>,
        location: Option<SourceLocation>,
    ) -> Self {
        Self {
            message: message.into(),
            level,
            source,
            location,
        }
    }
}

/// The result of running one plugin command or validation pass.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub plugin_name: String,
    pub command_name: String,
    pub status: ExecutionStatus,
    pub messages: Vec<ExecutionMessage>,
}

impl ExecutionResult {
    pub fn new(
        plugin_name: impl Into<String>,
        command_name: impl Into<String>,
        status: ExecutionStatus,
        messages: Vec<ExecutionMessage>,
    ) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            command_name: command_name.into(),
            status,
            messages,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    pub fn add_message(&mut self, message: ExecutionMessage) {
        self.messages.push(message);
    }

    /// The combined messages in user-visible form. Line numbers are
    /// rendered 1-based.
    pub fn messages_as_string(&self) -> String {
        self.messages
            .iter()
            .map(|message| {
                let mut rendered = message.message.clone();
                if let (Some(source), Some(location)) = (&message.source, &message.location) {
                    rendered.push_str(&format!(
                        "\n  Source: {} (Ln {}: Col {}: Pos {}: Spn {})",
                        source.uri(),
                        location.display_line(),
                        location.column,
                        location.position,
                        location.span,
                    ));
                }
                rendered
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(ExecutionStatus::Success.exit_code(), 0);
        assert_eq!(ExecutionStatus::ConstraintFailure.exit_code(), 1);
        assert_eq!(ExecutionStatus::ConstraintWarning.exit_code(), 2);
        assert_eq!(ExecutionStatus::ParserFailure.exit_code(), 3);
        assert_eq!(ExecutionStatus::PluginFailure.exit_code(), 4);
        assert_eq!(ExecutionStatus::OperationCancelled.exit_code(), 5);
        assert_eq!(ExecutionStatus::GeneralFailure.exit_code(), 6);
    }

    #[test]
    fn messages_render_with_source_and_one_based_line() {
        let source = Arc::new(SourceFile::new("model.yaml", true));
        let location = SourceLocation::new(2, 4, 30, 5);
        let result = ExecutionResult::new(
            "runtime",
            "check",
            ExecutionStatus::ConstraintFailure,
            vec![ExecutionMessage::new(
                "bad value",
                MessageLevel::Error,
                Some(source),
                Some(location),
            )],
        );
        assert_eq!(
            result.messages_as_string(),
            "bad value\n  Source: model.yaml (Ln 3: Col 4: Pos 30: Spn 5)"
        );
    }
}
