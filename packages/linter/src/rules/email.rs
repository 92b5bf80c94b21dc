use crate::diagnostic::{Diagnostic, Field, FieldKind};
use crate::rules::LintRule;
use regex::Regex;

/// Lint rule requiring author emails to be well formed
pub struct EmailRule;

impl LintRule for EmailRule {
    fn name(&self) -> &'static str {
        "well-formed-email"
    }

    fn description(&self) -> &'static str {
        "Author email addresses must be well formed"
    }

    fn check_field(&self, field: &Field) -> Vec<Diagnostic> {
        if field.kind != FieldKind::Email || field.text.is_empty() {
            return Vec::new();
        }
        let re = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
        if re.is_match(&field.text) {
            return Vec::new();
        }
        vec![Diagnostic::error(
            self.name(),
            format!("'{}' is not a well-formed email address", field.text),
            field,
        )]
    }
}
