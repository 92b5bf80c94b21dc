use crate::diagnostic::{Diagnostic, DiagnosticLevel, FieldKind};
use crate::rules::{LabelScope, LintRule};
use std::collections::HashMap;

/// Lint rule detecting duplicate label mnemonics within one scope
pub struct HotkeyRule;

impl LintRule for HotkeyRule {
    fn name(&self) -> &'static str {
        "unique-hotkeys"
    }

    fn description(&self) -> &'static str {
        "Label mnemonics must be unique within their enclosing scope"
    }

    fn check_label_scope(&self, scope: &LabelScope) -> Vec<Diagnostic> {
        let mut seen: HashMap<char, usize> = HashMap::new();
        let mut diagnostics = Vec::new();

        for (index, label) in scope.labels.iter().enumerate() {
            let Some(mnemonic) = mnemonic_of(&label.text) else {
                continue;
            };
            match seen.get(&mnemonic) {
                Some(&first) => diagnostics.push(Diagnostic {
                    level: DiagnosticLevel::Warning,
                    rule: self.name().to_string(),
                    message: format!(
                        "mnemonic '{}' of '{}' is already used by '{}'",
                        mnemonic, label.text, scope.labels[first].text
                    ),
                    kind: FieldKind::ParameterLabel,
                    path: label.path,
                    suggestion: Some("Pick a different mnemonic letter".to_string()),
                }),
                None => {
                    seen.insert(mnemonic, index);
                }
            }
        }
        diagnostics
    }
}

/// Extract the mnemonic character marked by an underscore. A doubled
/// underscore is an escaped literal and marks nothing. Comparison is
/// case-insensitive.
fn mnemonic_of(label: &str) -> Option<char> {
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        if c != '_' {
            continue;
        }
        match chars.next() {
            Some('_') => continue,
            Some(marked) => return marked.to_lowercase().next(),
            None => return None,
        }
    }
    None
}
