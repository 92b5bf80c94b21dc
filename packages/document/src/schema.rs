//! Schema descriptors and structural validation.
//!
//! One descriptor exists per (kind, version) pair, stored as JSON in the
//! configured schema directory. A descriptor maps element tags to a rule:
//! required/optional attributes plus an ordered child model. Child model
//! items are written as `tag`, `tag?`, `tag*`, `tag+`, and a single item may
//! list alternative tags separated by `|` (`string|int|flag*`). Like a DTD,
//! rules are keyed by element name alone, so an element used in two contexts
//! carries the union of both shapes.

use seisflow_common::Version;
use seisflow_dom::{NodeId, Tree};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct SchemaDescriptor {
    pub kind: String,
    pub version: Version,
    pub elements: HashMap<String, ElementRule>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ElementRule {
    #[serde(default)]
    pub attributes: AttributeRule,
    /// Ordered child model; empty means a text leaf.
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttributeRule {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cardinality {
    One,
    Optional,
    Many,
    AtLeastOne,
}

struct ChildItem<'a> {
    tags: Vec<&'a str>,
    cardinality: Cardinality,
}

fn parse_item(item: &str) -> ChildItem<'_> {
    let (body, cardinality) = match item.chars().last() {
        Some('?') => (&item[..item.len() - 1], Cardinality::Optional),
        Some('*') => (&item[..item.len() - 1], Cardinality::Many),
        Some('+') => (&item[..item.len() - 1], Cardinality::AtLeastOne),
        _ => (item, Cardinality::One),
    };
    ChildItem {
        tags: body.split('|').collect(),
        cardinality,
    }
}

impl SchemaDescriptor {
    /// Structurally validate a tree against this descriptor.
    ///
    /// Returns the first violation found, as a human-readable message.
    pub fn validate(&self, tree: &Tree) -> Result<(), String> {
        let root = tree.root();
        if tree.tag(root) != self.kind {
            return Err(format!(
                "root element is <{}>, expected <{}>",
                tree.tag(root),
                self.kind
            ));
        }
        self.validate_element(tree, root)
    }

    fn validate_element(&self, tree: &Tree, id: NodeId) -> Result<(), String> {
        let tag = tree.tag(id);
        let rule = self
            .elements
            .get(tag)
            .ok_or_else(|| format!("unknown element <{}>", tag))?;

        for required in &rule.attributes.required {
            if tree.attribute(id, required).is_none() {
                return Err(format!("<{}> is missing attribute '{}'", tag, required));
            }
        }
        for (name, _) in tree.attributes(id) {
            if !rule.attributes.required.iter().any(|a| a == name)
                && !rule.attributes.optional.iter().any(|a| a == name)
            {
                return Err(format!("<{}> carries unknown attribute '{}'", tag, name));
            }
        }

        if rule.children.is_empty() {
            if !tree.children(id).is_empty() {
                return Err(format!("<{}> must not contain child elements", tag));
            }
            return Ok(());
        }
        if !tree.text(id).is_empty() {
            return Err(format!("<{}> must not contain text", tag));
        }

        self.match_children(tree, id, rule)?;
        for &child in tree.children(id) {
            self.validate_element(tree, child)?;
        }
        Ok(())
    }

    /// Sequentially match the ordered child model against the actual children.
    fn match_children(&self, tree: &Tree, id: NodeId, rule: &ElementRule) -> Result<(), String> {
        let children = tree.children(id);
        let mut pos = 0;

        for item in rule.children.iter().map(|i| parse_item(i)) {
            let matches = |pos: usize| {
                pos < children.len() && item.tags.contains(&tree.tag(children[pos]))
            };
            match item.cardinality {
                Cardinality::One => {
                    if !matches(pos) {
                        return Err(self.expected(tree, id, &item, children.get(pos)));
                    }
                    pos += 1;
                }
                Cardinality::Optional => {
                    if matches(pos) {
                        pos += 1;
                    }
                }
                Cardinality::Many => {
                    while matches(pos) {
                        pos += 1;
                    }
                }
                Cardinality::AtLeastOne => {
                    if !matches(pos) {
                        return Err(self.expected(tree, id, &item, children.get(pos)));
                    }
                    while matches(pos) {
                        pos += 1;
                    }
                }
            }
        }

        if pos < children.len() {
            return Err(format!(
                "<{}> has unexpected child <{}> at position {}",
                tree.tag(id),
                tree.tag(children[pos]),
                pos
            ));
        }
        Ok(())
    }

    fn expected(
        &self,
        tree: &Tree,
        id: NodeId,
        item: &ChildItem<'_>,
        found: Option<&NodeId>,
    ) -> String {
        let found = match found {
            Some(&child) => format!("<{}>", tree.tag(child)),
            None => "end of children".to_string(),
        };
        format!(
            "<{}> expects <{}> here, found {}",
            tree.tag(id),
            item.tags.join("|"),
            found
        )
    }
}
