//! # Dictionary Manager
//!
//! Every document owns an ordered dictionary of named typed variables. A
//! flow evaluates variables defined at flow, line and project scope as one
//! flattened dictionary: `merge_dicts` relocates line and project entries
//! into the flow (tagging each with its origin scope), `split_dict` is the
//! inverse. `canonize_dict_parameters` rewrites human-entered keywords into
//! unique machine identifiers and accumulates the old→new mapping so
//! expressions referencing old keywords can be rewritten consistently.

use crate::document::Document;
use crate::error::{DocumentError, DocumentResult};
use crate::parameter::ParameterType;
use crate::sequence::SequenceElement;
use seisflow_dom::NodeId;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Accumulated mapping from every original keyword ever seen to its
/// canonical form.
pub type NameMap = HashMap<String, String>;

/// Handle to a document's `<dictionary>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dictionary(pub(crate) NodeId);

/// Handle to one dictionary entry: a named, typed variable with a value
/// expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictEntry(pub(crate) NodeId);

impl SequenceElement for DictEntry {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl Document {
    /// The document's dictionary. Present on every current-version document.
    pub fn dictionary(&self) -> Dictionary {
        match self.tree().child_by_tag(self.root(), "dictionary") {
            Some(node) => Dictionary(node),
            // Only reachable on a hand-built tree; current schemas require it.
            None => Dictionary(self.root()),
        }
    }
}

impl Dictionary {
    pub fn entries(&self, doc: &Document) -> Vec<DictEntry> {
        doc.tree()
            .children_by_tag(self.0, "parameter")
            .map(DictEntry)
            .collect()
    }

    /// Append a typed variable. Dictionary entries are restricted to the
    /// int/float/string/flag variants.
    pub fn append_entry(
        &self,
        doc: &mut Document,
        ptype: ParameterType,
        keyword: &str,
        value: &str,
    ) -> DocumentResult<DictEntry> {
        match ptype {
            ParameterType::Int
            | ParameterType::Float
            | ParameterType::String
            | ParameterType::Flag => {}
            other => {
                return Err(DocumentError::invalid(format!(
                    "dictionary entries cannot be of type {}",
                    other.as_str()
                )))
            }
        }
        let tree = doc.tree_mut();
        let node = tree.create_element("parameter");
        tree.set_attribute(node, "type", ptype.as_str());
        let kw = tree.create_element("keyword");
        tree.set_text(kw, keyword);
        tree.append_child(node, kw)?;
        let val = tree.create_element("value");
        tree.set_text(val, value);
        tree.append_child(node, val)?;
        tree.append_child(self.0, node)?;
        Ok(DictEntry(node))
    }
}

impl DictEntry {
    pub fn ptype(&self, doc: &Document) -> ParameterType {
        doc.tree()
            .attribute(self.0, "type")
            .and_then(ParameterType::from_name)
            .unwrap_or(ParameterType::String)
    }

    pub fn keyword<'a>(&self, doc: &'a Document) -> &'a str {
        self.child_text(doc, "keyword")
    }

    pub fn set_keyword(&self, doc: &mut Document, keyword: &str) {
        let node = doc.ensure_child(self.0, "keyword");
        doc.tree_mut().set_text(node, keyword);
    }

    pub fn value<'a>(&self, doc: &'a Document) -> &'a str {
        self.child_text(doc, "value")
    }

    pub fn set_value(&self, doc: &mut Document, value: &str) {
        let node = doc.ensure_child(self.0, "value");
        doc.tree_mut().set_text(node, value);
    }

    /// Origin scope recorded at merge time, if any.
    pub fn scope<'a>(&self, doc: &'a Document) -> Option<&'a str> {
        doc.tree().attribute(self.0, "scope")
    }

    fn child_text<'a>(&self, doc: &'a Document, tag: &str) -> &'a str {
        match doc.tree().child_by_tag(self.0, tag) {
            Some(node) => doc.tree().text(node),
            None => "",
        }
    }
}

/// Flatten line and project dictionaries into the flow's own.
///
/// Line entries are appended after the flow's, project entries after the
/// line's, each scope preserving its internal order. Every entry is tagged
/// with its origin scope so [`split_dict`] can repartition later. Entries
/// that fail the optional validity check are dropped during the merge rather
/// than copied. Not atomic: a mid-merge failure leaves all three documents
/// suspect.
pub fn merge_dicts(
    flow: &mut Document,
    line: &mut Document,
    project: &mut Document,
    validator: Option<&dyn Fn(&str, &str) -> bool>,
) -> DocumentResult<()> {
    let dictionary = flow.dictionary();
    for entry in dictionary.entries(flow) {
        flow.tree_mut().set_attribute(entry.0, "scope", "flow");
    }
    relocate_entries(line, "line", flow, validator)?;
    relocate_entries(project, "project", flow, validator)?;
    Ok(())
}

fn relocate_entries(
    source: &mut Document,
    scope: &str,
    flow: &mut Document,
    validator: Option<&dyn Fn(&str, &str) -> bool>,
) -> DocumentResult<()> {
    let source_dictionary = source.dictionary();
    let flow_dictionary = flow.dictionary();
    let mut dropped = 0usize;
    for entry in source_dictionary.entries(source) {
        let keep = validator.map_or(true, |valid| valid(entry.keyword(source), entry.value(source)));
        // Two-phase move: detach from the owner, then import into the flow.
        // The detached handle keeps the entry readable until the import.
        let held = source.tree_mut().detach(entry.0)?;
        if keep {
            let copy = flow.tree_mut().import(source.tree(), held.id());
            flow.tree_mut().append_child(flow_dictionary.0, copy)?;
            flow.tree_mut().set_attribute(copy, "scope", scope);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        debug!(scope, dropped, "invalid dictionary entries dropped during merge");
    }
    Ok(())
}

/// Repartition a flattened dictionary back to its owning scopes.
///
/// The inverse of [`merge_dicts`]: given the flow's flattened dictionary and
/// independently-supplied (now dictionary-empty) line and project documents,
/// each entry returns to the owner its scope tag names, in original relative
/// order. Scope tags are consumed.
pub fn split_dict(
    flow: &mut Document,
    line: &mut Document,
    project: &mut Document,
) -> DocumentResult<()> {
    for entry in flow.dictionary().entries(flow) {
        let scope = entry.scope(flow).unwrap_or("flow").to_string();
        let target = match scope.as_str() {
            "line" => Some(&mut *line),
            "project" => Some(&mut *project),
            _ => None,
        };
        match target {
            Some(target) => {
                let held = flow.tree_mut().detach(entry.0)?;
                let copy = target.tree_mut().import(flow.tree(), held.id());
                target.tree_mut().remove_attribute(copy, "scope");
                let target_dictionary = target.dictionary();
                target.tree_mut().append_child(target_dictionary.0, copy)?;
            }
            None => flow.tree_mut().remove_attribute(entry.0, "scope"),
        }
    }
    Ok(())
}

/// Canonical identifier: non-empty, lowercase alphanumerics and underscores,
/// not starting with a digit.
fn is_canonical(keyword: &str) -> bool {
    !keyword.is_empty()
        && keyword
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !keyword.starts_with(|c: char| c.is_ascii_digit())
}

/// Base canonical form, before collision numbering.
fn canonical_base(keyword: &str) -> String {
    let lowered = keyword.to_lowercase();
    let substituted: String = lowered
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let trimmed = substituted.trim_matches('_');
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("var_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Rewrite every non-canonical dictionary keyword into a unique canonical
/// identifier, accumulating the original→canonical mapping into `names`.
///
/// Collisions against names already canonical in the document are resolved
/// by appending `_1`, `_2`, … in first-seen order. An empty or
/// whitespace-only keyword canonicalizes to the empty string and still
/// participates in collision numbering (observed legacy behavior, kept
/// as-is).
pub fn canonize_dict_parameters(doc: &mut Document, names: &mut NameMap) {
    let dictionary = doc.dictionary();
    let entries = dictionary.entries(doc);

    let mut taken: HashSet<String> = entries
        .iter()
        .map(|e| e.keyword(doc))
        .filter(|k| is_canonical(k))
        .map(str::to_string)
        .collect();

    for entry in entries {
        let original = entry.keyword(doc).to_string();
        if is_canonical(&original) {
            names.entry(original.clone()).or_insert(original);
            continue;
        }
        let base = canonical_base(&original);
        let mut candidate = base.clone();
        let mut suffix = 0usize;
        while taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}_{suffix}");
        }
        taken.insert(candidate.clone());
        entry.set_keyword(doc, &candidate);
        names.insert(original, candidate);
    }
}
