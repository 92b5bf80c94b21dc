use crate::diagnostic::{Diagnostic, Field};
use crate::rules::LintRule;

/// Lint rule against leading or trailing whitespace
pub struct EdgeWhitespaceRule;

impl LintRule for EdgeWhitespaceRule {
    fn name(&self) -> &'static str {
        "no-edge-whitespace"
    }

    fn description(&self) -> &'static str {
        "Fields must not start or end with whitespace"
    }

    fn check_field(&self, field: &Field) -> Vec<Diagnostic> {
        if field.text.is_empty() || field.text == field.text.trim() {
            return Vec::new();
        }
        vec![Diagnostic::warning(
            self.name(),
            format!("{} has leading or trailing whitespace", field.kind.as_str()),
            field,
        )
        .with_suggestion(format!("Trim the field to '{}'", field.text.trim()))]
    }
}

/// Lint rule against doubled interior whitespace
pub struct DuplicateWhitespaceRule;

impl LintRule for DuplicateWhitespaceRule {
    fn name(&self) -> &'static str {
        "no-duplicate-whitespace"
    }

    fn description(&self) -> &'static str {
        "Fields must not contain consecutive whitespace characters"
    }

    fn check_field(&self, field: &Field) -> Vec<Diagnostic> {
        let interior = field.text.trim();
        let mut chars = interior.chars().peekable();
        let mut doubled = false;
        while let Some(c) = chars.next() {
            if c.is_whitespace() && chars.peek().is_some_and(|n| n.is_whitespace()) {
                doubled = true;
                break;
            }
        }
        if !doubled {
            return Vec::new();
        }
        vec![Diagnostic::warning(
            self.name(),
            format!("{} contains consecutive whitespace", field.kind.as_str()),
            field,
        )]
    }
}
