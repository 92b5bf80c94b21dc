//! Project documents: an ordered sequence of line references.

use crate::config::DocumentConfig;
use crate::document::{Document, DocumentKind};
use crate::error::{DocumentError, DocumentResult};
use crate::sequence::SequenceElement;
use seisflow_dom::NodeId;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// A document grouping line references.
#[derive(Debug, Clone)]
pub struct Project {
    doc: Document,
}

impl Project {
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            doc: Document::new(DocumentKind::Project, config),
        }
    }

    pub fn load(path: impl AsRef<Path>, config: &DocumentConfig) -> DocumentResult<Self> {
        Document::load(path, config).and_then(Self::try_from)
    }

    pub fn from_xml(xml: &str, config: &DocumentConfig) -> DocumentResult<Self> {
        Document::from_xml(xml, config).and_then(Self::try_from)
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn lines(&self) -> Vec<ProjectLine> {
        self.doc
            .tree()
            .children_by_tag(self.doc.root(), "line")
            .map(ProjectLine)
            .collect()
    }

    /// Look up a line reference by its source string.
    pub fn find_line(&self, source: &str) -> Option<ProjectLine> {
        self.lines()
            .into_iter()
            .find(|l| l.source(self) == source)
    }

    /// Append a reference to a line by source path.
    ///
    /// Duplicate detection is by source string: when the project already
    /// references that source, the existing entry is returned unchanged.
    pub fn append_line(&mut self, source: &str) -> ProjectLine {
        if let Some(existing) = self.find_line(source) {
            return existing;
        }
        let root = self.doc.root();
        let tree = self.doc.tree_mut();
        let node = tree.create_element("line");
        tree.set_attribute(node, "source", source);
        let _ = tree.append_child(root, node);
        ProjectLine(node)
    }
}

impl TryFrom<Document> for Project {
    type Error = DocumentError;

    fn try_from(doc: Document) -> DocumentResult<Self> {
        match doc.kind() {
            DocumentKind::Project => Ok(Self { doc }),
            other => Err(DocumentError::WrongKind {
                expected: "project",
                found: other.root_tag(),
            }),
        }
    }
}

impl Deref for Project {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.doc
    }
}

impl DerefMut for Project {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.doc
    }
}

/// Reference to a line by source path, resolvable to a Line document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectLine(pub(crate) NodeId);

impl SequenceElement for ProjectLine {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl ProjectLine {
    pub fn source<'a>(&self, project: &'a Project) -> &'a str {
        project.tree().attribute(self.0, "source").unwrap_or("")
    }

    pub fn set_source(&self, project: &mut Project, source: &str) {
        project
            .doc
            .tree_mut()
            .set_attribute(self.0, "source", source);
    }
}
