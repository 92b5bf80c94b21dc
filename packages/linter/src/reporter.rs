use crate::diagnostic::{Diagnostic, Field, FieldKind, FieldPath};
use crate::rules::{LabelScope, RuleRegistry, ScopedLabel};
use seisflow_document::{Flow, Group, Parameters};

/// Options for configuring the reporter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,
}

/// One audited field: its original text and whether any rule flagged it.
#[derive(Debug, Clone)]
pub struct FieldReport {
    pub kind: FieldKind,
    pub path: FieldPath,
    pub text: String,
    pub compliant: bool,
}

impl FieldReport {
    /// The original text when compliant, a marked rendering otherwise.
    pub fn rendering(&self) -> String {
        if self.compliant {
            self.text.clone()
        } else {
            format!("*{}*", self.text)
        }
    }
}

/// The full audit of a flow's editorial quality.
#[derive(Debug)]
pub struct Report {
    pub fields: Vec<FieldReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Number of potential defects found.
    pub fn defect_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics attributed to one field.
    pub fn diagnostics_for(&self, kind: FieldKind, path: FieldPath) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == kind && d.path == path)
            .collect()
    }
}

/// Audit a flow's editorial quality and return a structured report.
///
/// Schema validity is not re-checked here; the flow is assumed to be loaded
/// and migrated. The audit is a pure function of the document.
pub fn lint_flow(flow: &Flow, options: LintOptions) -> Report {
    let registry = options.registry.unwrap_or_default();

    let mut fields = Vec::new();
    let mut scopes = Vec::new();
    collect(flow, &mut fields, &mut scopes);

    let mut diagnostics = Vec::new();
    for field in &fields {
        for rule in registry.rules() {
            diagnostics.extend(rule.check_field(field));
        }
    }
    for scope in &scopes {
        for rule in registry.rules() {
            diagnostics.extend(rule.check_label_scope(scope));
        }
    }

    let fields = fields
        .into_iter()
        .map(|field| {
            let compliant = !diagnostics
                .iter()
                .any(|d| d.kind == field.kind && d.path == field.path);
            FieldReport {
                kind: field.kind,
                path: field.path,
                text: field.text,
                compliant,
            }
        })
        .collect();

    Report {
        fields,
        diagnostics,
    }
}

fn collect(flow: &Flow, fields: &mut Vec<Field>, scopes: &mut Vec<LabelScope>) {
    let at = FieldPath::flow();
    push(fields, FieldKind::Title, at, flow.title());
    push(fields, FieldKind::Description, at, flow.description());
    push(fields, FieldKind::Author, at, flow.author());
    push(fields, FieldKind::Email, at, flow.email());

    for (i, program) in flow.programs().iter().enumerate() {
        let at = FieldPath::program(i);
        push(fields, FieldKind::ProgramTitle, at, program.title(flow));
        push(
            fields,
            FieldKind::ProgramDescription,
            at,
            program.description(flow),
        );
        push(fields, FieldKind::ProgramBinary, at, program.binary(flow));
        if let Some((origin, _)) = program.menu(flow) {
            push(fields, FieldKind::MenuFilename, at, origin);
        }

        collect_parameters(flow, program.parameters(flow), i, fields, scopes);
    }
}

/// Walk one parameter collection: capture every label, group one hotkey
/// scope per collection, and descend into group templates with sub-parameter
/// attribution.
fn collect_parameters(
    flow: &Flow,
    parameters: Parameters,
    program: usize,
    fields: &mut Vec<Field>,
    scopes: &mut Vec<LabelScope>,
) {
    let mut labels = Vec::new();
    for (j, parameter) in parameters.parameters(flow).iter().enumerate() {
        let at = FieldPath::parameter(program, j);
        let label = parameter.label(flow);
        push(fields, FieldKind::ParameterLabel, at, label);
        labels.push(ScopedLabel {
            path: at,
            text: label.to_string(),
        });

        let Some(group) = Group::of(*parameter, flow) else {
            continue;
        };
        let Ok(template) = group.template(flow) else {
            continue;
        };
        let mut inner = Vec::new();
        for (k, member) in template.parameters(flow).iter().enumerate() {
            let at = FieldPath::subparameter(program, j, k);
            let label = member.label(flow);
            push(fields, FieldKind::ParameterLabel, at, label);
            inner.push(ScopedLabel {
                path: at,
                text: label.to_string(),
            });
        }
        scopes.push(LabelScope { labels: inner });
    }
    scopes.push(LabelScope { labels });
}

fn push(fields: &mut Vec<Field>, kind: FieldKind, path: FieldPath, text: &str) {
    fields.push(Field {
        kind,
        path,
        text: text.to_string(),
    });
}
