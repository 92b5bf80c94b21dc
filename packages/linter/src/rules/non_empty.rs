use crate::diagnostic::{Diagnostic, Field};
use crate::rules::LintRule;

/// Lint rule requiring every captured field to carry text
pub struct NonEmptyRule;

impl LintRule for NonEmptyRule {
    fn name(&self) -> &'static str {
        "non-empty"
    }

    fn description(&self) -> &'static str {
        "Required fields must not be empty"
    }

    fn check_field(&self, field: &Field) -> Vec<Diagnostic> {
        if field.text.trim().is_empty() {
            vec![Diagnostic::error(
                self.name(),
                format!("{} is empty", field.kind.as_str()),
                field,
            )]
        } else {
            Vec::new()
        }
    }
}
