use crate::diagnostic::{Diagnostic, Field, FieldKind};
use crate::rules::LintRule;

/// Lint rule requiring titles, descriptions and labels to start uppercase
pub struct CapitalizationRule;

impl LintRule for CapitalizationRule {
    fn name(&self) -> &'static str {
        "no-leading-lowercase"
    }

    fn description(&self) -> &'static str {
        "Titles, descriptions and labels should not start with a lowercase letter"
    }

    fn check_field(&self, field: &Field) -> Vec<Diagnostic> {
        if !applies_to(field.kind) {
            return Vec::new();
        }
        // Labels may carry a leading mnemonic marker ("_Save" displays "Save").
        let visible = field.text.trim_start_matches('_');
        match visible.chars().next() {
            Some(first) if first.is_lowercase() => {
                vec![Diagnostic::warning(
                    self.name(),
                    format!("{} starts with a lowercase letter", field.kind.as_str()),
                    field,
                )
                .with_suggestion(format!(
                    "Capitalize the first letter: '{}{}'",
                    first.to_uppercase(),
                    &visible[first.len_utf8()..]
                ))]
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
