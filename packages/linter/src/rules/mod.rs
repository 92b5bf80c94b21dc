mod capitalization;
mod email;
mod hotkeys;
mod menu_filename;
mod non_empty;
mod punctuation;
mod whitespace;

pub use capitalization::CapitalizationRule;
pub use email::EmailRule;
pub use hotkeys::HotkeyRule;
pub use menu_filename::MenuFilenameRule;
pub use non_empty::NonEmptyRule;
pub use punctuation::PunctuationRule;
pub use whitespace::{DuplicateWhitespaceRule, EdgeWhitespaceRule};

use crate::diagnostic::{Diagnostic, Field, FieldPath};

/// One label observed in a hotkey scope.
#[derive(Debug, Clone)]
pub struct ScopedLabel {
    pub path: FieldPath,
    pub text: String,
}

/// All parameter labels sharing one enclosing collection. Mnemonic markers
/// must be unique inside a scope; the same mnemonic in two different scopes
/// is fine.
#[derive(Debug, Clone)]
pub struct LabelScope {
    pub labels: Vec<ScopedLabel>,
}

/// Trait for implementing lint rules
pub trait LintRule {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check a single text field
    fn check_field(&self, _field: &Field) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check all labels of one enclosing scope together
    fn check_label_scope(&self, _scope: &LabelScope) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Registry of all available lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(NonEmptyRule),
                Box::new(CapitalizationRule),
                Box::new(EdgeWhitespaceRule),
                Box::new(DuplicateWhitespaceRule),
                Box::new(PunctuationRule),
                Box::new(EmailRule),
                Box::new(MenuFilenameRule),
                Box::new(HotkeyRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}
