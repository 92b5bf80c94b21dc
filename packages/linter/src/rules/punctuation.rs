use crate::diagnostic::{Diagnostic, Field, FieldKind};
use crate::rules::LintRule;

/// Lint rule against terminal punctuation in titles, descriptions and labels
pub struct PunctuationRule;

impl LintRule for PunctuationRule {
    fn name(&self) -> &'static str {
        "no-terminal-punctuation"
    }

    fn description(&self) -> &'static str {
        "Titles, descriptions and labels must not end with punctuation"
    }

    fn check_field(&self, field: &Field) -> Vec<Diagnostic> {
        if !applies_to(field.kind) {
            return Vec::new();
        }
        // A closing parenthesis is allowed: units like "(m)" legitimately
        // terminate labels.
        let last = field.text.trim_end().chars().last();
        match last {
            Some(c) if ".,:;!?".contains(c) => {
                vec![Diagnostic::warning(
                    self.name(),
                    format!("{} ends with '{}'", field.kind.as_str(), c),
                    field,
                )]
            }
            _ => Vec::new(),
        }
    }
}

fn applies_to(kind: FieldKind) -> bool {
    matches!(
        kind,
        FieldKind::Title
            | FieldKind::Description
            | FieldKind::ProgramTitle
            | FieldKind::ProgramDescription
            | FieldKind::ParameterLabel
    )
}
