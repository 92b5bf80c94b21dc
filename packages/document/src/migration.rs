//! # Schema Migration Engine
//!
//! Stepwise, monotonic upgrade of a loaded document from its declared
//! version to the current one. Steps are ordered by target version; a step
//! runs only when the document has not yet crossed its threshold, performs
//! its structural edits, and the engine then advances the stamped version
//! attribute. Migration only ever touches the in-memory tree.
//!
//! Version history:
//!
//! - flow: 0.1.0 → 0.2.0 (date + io blocks) → 0.3.0 (parameter envelopes)
//!   → 0.3.1 (program status/io attributes) → 0.4.0 (dictionary, category
//!   relocation)
//! - line: 0.1.0 → 0.2.0 (dictionary)
//! - project: 0.1.0 → 0.2.0 (dictionary)

use crate::document::DocumentKind;
use crate::error::{DocumentError, DocumentResult};
use seisflow_common::Version;
use seisflow_dom::{NodeId, Tree};
use tracing::debug;

/// One upgrade step: structural edits taking a tree from below `to` up to `to`.
pub struct MigrationStep {
    pub to: Version,
    pub apply: fn(&mut Tree) -> DocumentResult<()>,
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep").field("to", &self.to).finish()
    }
}

/// Immutable table of upgrade steps per document kind.
#[derive(Debug)]
pub struct MigrationTable {
    flow: Vec<MigrationStep>,
    line: Vec<MigrationStep>,
    project: Vec<MigrationStep>,
}

impl MigrationTable {
    /// The table covering every version observed historically.
    pub fn standard() -> Self {
        Self {
            flow: vec![
                MigrationStep {
                    to: Version::new(0, 2, 0),
                    apply: flow_add_date_and_io,
                },
                MigrationStep {
                    to: Version::new(0, 3, 0),
                    apply: flow_wrap_parameter_envelopes,
                },
                MigrationStep {
                    to: Version::new(0, 3, 1),
                    apply: flow_stamp_program_attributes,
                },
                MigrationStep {
                    to: Version::new(0, 4, 0),
                    apply: flow_add_dictionary_and_order_categories,
                },
            ],
            line: vec![MigrationStep {
                to: Version::new(0, 2, 0),
                apply: add_dictionary_after_date,
            }],
            project: vec![MigrationStep {
                to: Version::new(0, 2, 0),
                apply: add_dictionary_after_date,
            }],
        }
    }

    pub fn steps(&self, kind: DocumentKind) -> &[MigrationStep] {
        match kind {
            DocumentKind::Flow => &self.flow,
            DocumentKind::Line => &self.line,
            DocumentKind::Project => &self.project,
        }
    }

    /// The library's current version for a kind: the last step's target.
    pub fn current_version(&self, kind: DocumentKind) -> Version {
        self.steps(kind)
            .last()
            .map(|step| step.to)
            .unwrap_or(Version::new(0, 1, 0))
    }
}

/// Apply every step the declared version has not yet crossed, in increasing
/// order, stamping the version attribute after each. Idempotent on a current
/// document: no steps execute.
pub fn migrate(
    tree: &mut Tree,
    kind: DocumentKind,
    declared: Version,
    table: &MigrationTable,
) -> DocumentResult<Version> {
    let mut reached = declared;
    for step in table.steps(kind) {
        if step.to > reached {
            (step.apply)(tree)?;
            let root = tree.root();
            tree.set_attribute(root, "version", &step.to.to_string());
            debug!(kind = %kind.root_tag(), to = %step.to, "migration step applied");
            reached = step.to;
        }
    }
    Ok(reached)
}

// Step implementations. Each is total over the shapes its source schemas
// admit; a malformed shape that slipped past validation surfaces as an error
// and the caller must discard the document.

fn insert_after(tree: &mut Tree, parent: NodeId, node: NodeId, after_tag: &str) -> DocumentResult<()> {
    let anchor = match tree.child_by_tag(parent, after_tag) {
        Some(after) => {
            let pos = tree
                .position(after)
                .ok_or_else(|| DocumentError::invalid("anchor element is detached"))?;
            tree.children(parent).get(pos + 1).copied()
        }
        None => None,
    };
    tree.insert_before(parent, node, anchor)?;
    Ok(())
}

/// 0.1.0 → 0.2.0: insert the previously-absent `date` and `io` blocks.
fn flow_add_date_and_io(tree: &mut Tree) -> DocumentResult<()> {
    let root = tree.root();
    if tree.child_by_tag(root, "date").is_none() {
        let date = tree.create_element("date");
        for tag in ["created", "modified"] {
            let node = tree.create_element(tag);
            tree.append_child(date, node)?;
        }
        insert_after(tree, root, date, "email")?;
    }
    if tree.child_by_tag(root, "io").is_none() {
        let io = tree.create_element("io");
        for tag in ["input", "output", "error"] {
            let node = tree.create_element(tag);
            tree.append_child(io, node)?;
        }
        insert_after(tree, root, io, "date")?;
    }
    Ok(())
}

const BARE_PARAMETER_TAGS: &[&str] = &["string", "int", "float", "range", "file", "flag", "enum"];

/// 0.2.0 → 0.3.0: wrap bare typed parameter elements into
/// `<parameter type="…">` envelopes, relocating their children inside.
fn flow_wrap_parameter_envelopes(tree: &mut Tree) -> DocumentResult<()> {
    let root = tree.root();
    let programs: Vec<NodeId> = tree.children_by_tag(root, "program").collect();
    for program in programs {
        let Some(parameters) = tree.child_by_tag(program, "parameters") else {
            continue;
        };
        let bare: Vec<NodeId> = tree
            .children(parameters)
            .iter()
            .copied()
            .filter(|&c| BARE_PARAMETER_TAGS.contains(&tree.tag(c)))
            .collect();
        for old in bare {
            let envelope = tree.create_element("parameter");
            let type_name = tree.tag(old).to_string();
            tree.set_attribute(envelope, "type", &type_name);
            for (name, value) in tree.attributes(old).to_vec() {
                tree.set_attribute(envelope, &name, &value);
            }
            let inner: Vec<NodeId> = tree.children(old).to_vec();
            for child in inner {
                let held = tree.detach(child)?;
                tree.reattach(held, envelope, None)?;
            }
            tree.insert_before(parameters, envelope, Some(old))?;
            tree.remove(old)?;
        }
    }
    Ok(())
}

/// 0.3.0 → 0.3.1: stamp per-program fields that did not exist in the
/// original schema.
fn flow_stamp_program_attributes(tree: &mut Tree) -> DocumentResult<()> {
    let root = tree.root();
    let programs: Vec<NodeId> = tree.children_by_tag(root, "program").collect();
    for program in programs {
        if tree.attribute(program, "status").is_none() {
            tree.set_attribute(program, "status", "unconfigured");
        }
        for attr in ["stdin", "stdout", "stderr"] {
            if tree.attribute(program, attr).is_none() {
                tree.set_attribute(program, attr, "no");
            }
        }
    }
    Ok(())
}

/// 0.3.1 → 0.4.0: introduce the dictionary and relocate category elements
/// saved after the program run back before the `io` block.
fn flow_add_dictionary_and_order_categories(tree: &mut Tree) -> DocumentResult<()> {
    add_dictionary_after_date(tree)?;
    let root = tree.root();
    let io = tree
        .child_by_tag(root, "io")
        .ok_or_else(|| DocumentError::invalid("flow has no io block"))?;
    let categories: Vec<NodeId> = tree.children_by_tag(root, "category").collect();
    for category in categories {
        let held = tree.detach(category)?;
        tree.reattach(held, root, Some(io))?;
    }
    Ok(())
}

/// Shared step: insert an empty `dictionary` right after the `date` block.
fn add_dictionary_after_date(tree: &mut Tree) -> DocumentResult<()> {
    let root = tree.root();
    if tree.child_by_tag(root, "dictionary").is_none() {
        let dictionary = tree.create_element("dictionary");
        insert_after(tree, root, dictionary, "date")?;
    }
    Ok(())
}
