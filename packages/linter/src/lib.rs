//! Editorial audit of flow documents: rule-based checks on titles,
//! descriptions, emails, menu filenames and parameter labels, independent of
//! schema validity.

mod diagnostic;
mod reporter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel, Field, FieldKind, FieldPath};
pub use reporter::{lint_flow, FieldReport, LintOptions, Report};
pub use rules::{LabelScope, LintRule, RuleRegistry, ScopedLabel};
