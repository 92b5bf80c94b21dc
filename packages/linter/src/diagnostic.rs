use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// Positional attribution of a field within a flow: program index, parameter
/// index within that program, sub-parameter index for group members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    pub program: Option<usize>,
    pub parameter: Option<usize>,
    pub subparameter: Option<usize>,
}

impl FieldPath {
    /// A flow-level field (title, author, ...).
    pub fn flow() -> Self {
        Self::default()
    }

    pub fn program(program: usize) -> Self {
        Self {
            program: Some(program),
            ..Self::default()
        }
    }

    pub fn parameter(program: usize, parameter: usize) -> Self {
        Self {
            program: Some(program),
            parameter: Some(parameter),
            subparameter: None,
        }
    }

    pub fn subparameter(program: usize, parameter: usize, subparameter: usize) -> Self {
        Self {
            program: Some(program),
            parameter: Some(parameter),
            subparameter: Some(subparameter),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.program, self.parameter, self.subparameter) {
            (None, ..) => write!(f, "flow"),
            (Some(p), None, _) => write!(f, "program {p}"),
            (Some(p), Some(q), None) => write!(f, "program {p}, parameter {q}"),
            (Some(p), Some(q), Some(r)) => {
                write!(f, "program {p}, parameter {q}, sub-parameter {r}")
            }
        }
    }
}

/// Which document field a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Title,
    Description,
    Author,
    Email,
    ProgramTitle,
    ProgramDescription,
    ProgramBinary,
    MenuFilename,
    ParameterLabel,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Title => "title",
            FieldKind::Description => "description",
            FieldKind::Author => "author",
            FieldKind::Email => "email",
            FieldKind::ProgramTitle => "program title",
            FieldKind::ProgramDescription => "program description",
            FieldKind::ProgramBinary => "program binary",
            FieldKind::MenuFilename => "menu filename",
            FieldKind::ParameterLabel => "parameter label",
        }
    }
}

/// One text field captured during the traversal, ready for rule checks.
#[derive(Debug, Clone)]
pub struct Field {
    pub kind: FieldKind,
    pub path: FieldPath,
    pub text: String,
}

/// A diagnostic message from the reporter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level
    pub level: DiagnosticLevel,

    /// The rule that generated this diagnostic
    pub rule: String,

    /// Human-readable message
    pub message: String,

    /// The field the issue was found in
    pub kind: FieldKind,

    /// Position of that field within the flow
    pub path: FieldPath,

    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(rule: impl Into<String>, message: impl Into<String>, field: &Field) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            rule: rule.into(),
            message: message.into(),
            kind: field.kind,
            path: field.path,
            suggestion: None,
        }
    }

    pub fn warning(rule: impl Into<String>, message: impl Into<String>, field: &Field) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            rule: rule.into(),
            message: message.into(),
            kind: field.kind,
            path: field.path,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
