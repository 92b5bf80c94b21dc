use crate::diagnostic::{Diagnostic, Field, FieldKind};
use crate::rules::LintRule;

const MENU_EXTENSION: &str = ".mnu";

/// Lint rule for menu origin filenames
pub struct MenuFilenameRule;

impl LintRule for MenuFilenameRule {
    fn name(&self) -> &'static str {
        "valid-menu-filename"
    }

    fn description(&self) -> &'static str {
        "Menu origins must be bare filenames with the menu extension"
    }

    fn check_field(&self, field: &Field) -> Vec<Diagnostic> {
        if field.kind != FieldKind::MenuFilename {
            return Vec::new();
        }
        let mut diagnostics = Vec::new();
        if field.text.contains('/') || field.text.contains('\\') {
            diagnostics.push(Diagnostic::error(
                self.name(),
                format!("menu filename '{}' contains a path separator", field.text),
                field,
            ));
        }
        if !field.text.ends_with(MENU_EXTENSION) {
            diagnostics.push(
                Diagnostic::error(
                    self.name(),
                    format!(
                        "menu filename '{}' does not end with '{}'",
                        field.text, MENU_EXTENSION
                    ),
                    field,
                )
                .with_suggestion(format!("Rename the menu to end with '{MENU_EXTENSION}'")),
            );
        }
        diagnostics
    }
}
