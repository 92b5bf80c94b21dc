//! Line documents: flow references plus shared search paths.

use crate::config::DocumentConfig;
use crate::document::{Document, DocumentKind};
use crate::error::{DocumentError, DocumentResult};
use crate::sequence::SequenceElement;
use seisflow_dom::NodeId;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// A document grouping flow references with shared search paths.
#[derive(Debug, Clone)]
pub struct Line {
    doc: Document,
}

impl Line {
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            doc: Document::new(DocumentKind::Line, config),
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

    /// Server-group hint attached to this line, if any.
    pub fn group(&self) -> Option<&str> {
        self.doc.tree().attribute(self.doc.root(), "group")
    }

    pub fn set_group(&mut self, group: &str) {
        let root = self.doc.root();
        self.doc.tree_mut().set_attribute(root, "group", group);
    }

    // Flow references.

    pub fn flows(&self) -> Vec<LineFlow> {
        self.doc
            .tree()
            .children_by_tag(self.doc.root(), "flow")
            .map(LineFlow)
            .collect()
    }

    /// Append a reference to a flow by source path.
    pub fn append_flow(&mut self, source: &str) -> LineFlow {
        let root = self.doc.root();
        let tree = self.doc.tree_mut();
        let node = tree.create_element("flow");
        tree.set_attribute(node, "source", source);
        let _ = tree.append_child(root, node);
        LineFlow(node)
    }

    // Search paths.

    pub fn paths(&self) -> Vec<LinePath> {
        self.doc
            .tree()
            .children_by_tag(self.doc.root(), "path")
            .map(LinePath)
            .collect()
    }

    /// Append a search path used to resolve relative flow/file locations.
    pub fn append_path(&mut self, path: &str) -> LinePath {
        let root = self.doc.root();
        // Paths precede the flow reference run in schema order.
        let first_flow = self.doc.tree().child_by_tag(root, "flow");
        let tree = self.doc.tree_mut();
        let node = tree.create_element("path");
        tree.set_text(node, path);
        let _ = tree.insert_before(root, node, first_flow);
        LinePath(node)
    }

    /// Resolve a relative source against the line's search paths, returning
    /// the first existing candidate.
    pub fn resolve(&self, source: &str) -> Option<std::path::PathBuf> {
        let candidate = Path::new(source);
        if candidate.is_absolute() {
            return candidate.exists().then(|| candidate.to_path_buf());
        }
        self.paths()
            .iter()
            .map(|p| Path::new(p.path(self)).join(candidate))
            .find(|p| p.exists())
    }
}

impl TryFrom<Document> for Line {
    type Error = DocumentError;

    fn try_from(doc: Document) -> DocumentResult<Self> {
        match doc.kind() {
            DocumentKind::Line => Ok(Self { doc }),
            other => Err(DocumentError::WrongKind {
                expected: "line",
                found: other.root_tag(),
            }),
        }
    }
}

impl Deref for Line {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.doc
    }
}

impl DerefMut for Line {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.doc
    }
}

/// Reference to a flow by source path. Not an embedded flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFlow(pub(crate) NodeId);

impl SequenceElement for LineFlow {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl LineFlow {
    pub fn source<'a>(&self, line: &'a Line) -> &'a str {
        line.tree().attribute(self.0, "source").unwrap_or("")
    }

    pub fn set_source(&self, line: &mut Line, source: &str) {
        line.doc.tree_mut().set_attribute(self.0, "source", source);
    }
}

/// One search-path entry of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePath(pub(crate) NodeId);

impl SequenceElement for LinePath {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl LinePath {
    pub fn path<'a>(&self, line: &'a Line) -> &'a str {
        line.tree().text(self.0)
    }

    pub fn set_path(&self, line: &mut Line, path: &str) {
        line.doc.tree_mut().set_text(self.0, path);
    }
}
