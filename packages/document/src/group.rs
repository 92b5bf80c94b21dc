//! # Parameter Group Engine
//!
//! A group parameter holds a template collection (never evaluated directly)
//! and an ordered list of at least one instance cloned structurally from the
//! template. The first instance is the master; deinstantiation never removes
//! it. Non-instanciable groups surface the template itself as their single
//! fixed instance and refuse instantiate/deinstantiate outright.

use crate::document::Document;
use crate::error::{DocumentError, DocumentResult};
use crate::parameter::{Parameter, Parameters};
use seisflow_dom::NodeId;

/// Handle to a parameter of type `group`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group(pub(crate) NodeId);

impl Group {
    /// View a parameter as a group, when it is one.
    pub fn of(parameter: Parameter, doc: &Document) -> Option<Self> {
        parameter.is_group(doc).then_some(Self(parameter.0))
    }

    pub fn as_parameter(&self) -> Parameter {
        Parameter(self.0)
    }

    pub fn is_instanciable(&self, doc: &Document) -> bool {
        doc.tree().attribute(self.0, "instanciable") == Some("yes")
    }

    pub fn set_instanciable(&self, doc: &mut Document, instanciable: bool) {
        doc.tree_mut().set_attribute(
            self.0,
            "instanciable",
            if instanciable { "yes" } else { "no" },
        );
    }

    pub fn is_expanded(&self, doc: &Document) -> bool {
        doc.tree().attribute(self.0, "expand") == Some("yes")
    }

    pub fn set_expanded(&self, doc: &mut Document, expanded: bool) {
        doc.tree_mut()
            .set_attribute(self.0, "expand", if expanded { "yes" } else { "no" });
    }

    /// The template collection. Never surfaced as an evaluable instance for
    /// instanciable groups.
    pub fn template(&self, doc: &Document) -> DocumentResult<Parameters> {
        let template = doc
            .tree()
            .child_by_tag(self.0, "template")
            .ok_or_else(|| DocumentError::invalid("group has no template"))?;
        let parameters = doc
            .tree()
            .child_by_tag(template, "parameters")
            .ok_or_else(|| DocumentError::invalid("group template is empty"))?;
        Ok(Parameters(parameters))
    }

    /// The effective instance list, in order.
    ///
    /// A non-instanciable group behaves as a fixed single instance that is
    /// really just the template surfaced directly.
    pub fn instances(&self, doc: &Document) -> DocumentResult<Vec<Parameters>> {
        if !self.is_instanciable(doc) {
            return Ok(vec![self.template(doc)?]);
        }
        Ok(self.raw_instances(doc))
    }

    pub fn instance_count(&self, doc: &Document) -> DocumentResult<usize> {
        self.instances(doc).map(|i| i.len())
    }

    /// Deep-clone the template into a new instance appended to the list.
    pub fn instantiate(&self, doc: &mut Document) -> DocumentResult<Parameters> {
        if !self.is_instanciable(doc) {
            return Err(DocumentError::NotMasterInstance);
        }
        let template = self.template(doc)?;
        let tree = doc.tree_mut();
        let copy = tree.clone_subtree(template.0);
        tree.append_child(self.0, copy)?;
        Ok(Parameters(copy))
    }

    /// Remove the last instance. At least one instance must always exist, so
    /// removing the master alone is refused.
    pub fn deinstantiate(&self, doc: &mut Document) -> DocumentResult<()> {
        if !self.is_instanciable(doc) {
            return Err(DocumentError::NotMasterInstance);
        }
        let instances = self.raw_instances(doc);
        match instances.last() {
            Some(last) if instances.len() > 1 => {
                doc.tree_mut().remove(last.0)?;
                Ok(())
            }
            _ => Err(DocumentError::NotMasterInstance),
        }
    }

    /// Direct instance collections, excluding the template.
    fn raw_instances(&self, doc: &Document) -> Vec<Parameters> {
        doc.tree()
            .children_by_tag(self.0, "parameters")
            .map(Parameters)
            .collect()
    }
}
