//! # Document Abstraction
//!
//! Uniform lifecycle for Flow/Line/Project documents.
//!
//! ```text
//! Load → Reject embedded DTD → Validate (declared schema) → Migrate → Edit → Save
//! ```
//!
//! A `Document` exclusively owns its backing tree; every handle derived from
//! it (programs, parameters, dictionary entries) is an opaque index into that
//! tree and dies with it. Cloning a document deep-copies the tree, so clones
//! share nothing with their source.

use crate::config::DocumentConfig;
use crate::error::{DocumentError, DocumentResult};
use crate::migration;
use crate::sequence::{self, SequenceElement, SequenceError};
use chrono::{SecondsFormat, Utc};
use seisflow_common::Version;
use seisflow_dom::{parse, to_xml, Detached, DomError, NodeId, Tree};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Document kind, one per root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Flow,
    Line,
    Project,
}

impl DocumentKind {
    pub fn root_tag(self) -> &'static str {
        match self {
            DocumentKind::Flow => "flow",
            DocumentKind::Line => "line",
            DocumentKind::Project => "project",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "flow" => Some(DocumentKind::Flow),
            "line" => Some(DocumentKind::Line),
            "project" => Some(DocumentKind::Project),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_tag())
    }
}

/// A versioned, schema-validated tree document.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree,
    kind: DocumentKind,
}

/// Fields every document kind carries, in schema order.
const COMMON_FIELDS: &[&str] = &["filename", "title", "description", "help", "author", "email"];

impl Document {
    /// Create an empty document stamped with the kind's current version and
    /// the mandatory skeleton fields, all initialized to empty strings.
    pub fn new(kind: DocumentKind, config: &DocumentConfig) -> Self {
        let mut tree = Tree::new(kind.root_tag());
        let root = tree.root();
        let current = config.migrations().current_version(kind);
        tree.set_attribute(root, "version", &current.to_string());

        for field in COMMON_FIELDS {
            let node = tree.create_element(field);
            // append_child of a freshly created node cannot fail
            let _ = tree.append_child(root, node);
        }
        let help = tree
            .child_by_tag(root, "help")
            .unwrap_or(root);
        tree.set_cdata(help, "");

        let date = tree.create_element("date");
        let _ = tree.append_child(root, date);
        for field in ["created", "modified"] {
            let node = tree.create_element(field);
            let _ = tree.append_child(date, node);
        }

        let dictionary = tree.create_element("dictionary");
        let _ = tree.append_child(root, dictionary);

        if kind == DocumentKind::Flow {
            let io = tree.create_element("io");
            let _ = tree.append_child(root, io);
            for field in ["input", "output", "error"] {
                let node = tree.create_element(field);
                let _ = tree.append_child(io, node);
            }
        }

        let mut doc = Self { tree, kind };
        let now = Self::timestamp();
        doc.set_date_created(&now);
        doc.set_date_modified(&now);
        doc
    }

    /// Load a document from a file, validate it against its declared schema
    /// version and migrate it to the current version in memory.
    ///
    /// The on-disk file is never touched; persisting the upgraded form is the
    /// caller's choice via [`Document::save`].
    pub fn load(path: impl AsRef<Path>, config: &DocumentConfig) -> DocumentResult<Self> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocumentError::FileNotFound(path.to_path_buf()),
            _ => DocumentError::CantAccessFile {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let mut doc = Self::from_xml(&xml, config)?;
        doc.set_filename(&path.to_string_lossy());
        Ok(doc)
    }

    /// Load a document from an in-memory buffer.
    pub fn from_xml(xml: &str, config: &DocumentConfig) -> DocumentResult<Self> {
        let mut tree = parse(xml).map_err(|e| match e {
            DomError::DoctypeDeclared => DocumentError::DtdSpecified,
            other => DocumentError::invalid(other.to_string()),
        })?;

        let root = tree.root();
        let kind = DocumentKind::from_tag(tree.tag(root))
            .ok_or_else(|| DocumentError::invalid(format!("unknown root <{}>", tree.tag(root))))?;
        let declared: Version = tree
            .attribute(root, "version")
            .ok_or_else(|| DocumentError::invalid("missing version attribute"))?
            .parse()
            .map_err(|e| DocumentError::invalid(format!("{e}")))?;

        let current = config.migrations().current_version(kind);
        if declared > current {
            return Err(DocumentError::NewerVersion { declared, current });
        }

        // Structural validity is checked against the declared historical
        // schema, not the newest one.
        let schema = config.load_schema(kind, declared)?;
        schema
            .validate(&tree)
            .map_err(DocumentError::InvalidDocument)?;

        let reached = migration::migrate(&mut tree, kind, declared, config.migrations())?;
        debug!(kind = %kind, from = %declared, to = %reached, "document loaded");

        Ok(Self { tree, kind })
    }

    /// Serialize to a file, creating it if it does not exist.
    pub fn save(&self, path: impl AsRef<Path>) -> DocumentResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_xml()).map_err(|e| DocumentError::CantAccessFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Serialize the current in-memory tree.
    pub fn to_xml(&self) -> String {
        to_xml(&self.tree)
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The version currently stamped on the root element.
    pub fn version(&self) -> Option<Version> {
        self.tree
            .attribute(self.tree.root(), "version")?
            .parse()
            .ok()
    }

    // Field accessors. Unset fields read as "".

    pub fn filename(&self) -> &str {
        self.field("filename")
    }

    pub fn set_filename(&mut self, filename: &str) {
        self.set_field("filename", filename);
    }

    pub fn title(&self) -> &str {
        self.field("title")
    }

    pub fn set_title(&mut self, title: &str) {
        self.set_field("title", title);
    }

    pub fn description(&self) -> &str {
        self.field("description")
    }

    pub fn set_description(&mut self, description: &str) {
        self.set_field("description", description);
    }

    pub fn author(&self) -> &str {
        self.field("author")
    }

    pub fn set_author(&mut self, author: &str) {
        self.set_field("author", author);
    }

    pub fn email(&self) -> &str {
        self.field("email")
    }

    pub fn set_email(&mut self, email: &str) {
        self.set_field("email", email);
    }

    /// Rich-text help. Stored as CDATA; an interior `]]>` survives a save as
    /// the substitute sequence `]]&gt;`.
    pub fn help(&self) -> &str {
        self.field("help")
    }

    pub fn set_help(&mut self, help: &str) {
        let root = self.tree.root();
        let node = self.ensure_child(root, "help");
        self.tree.set_cdata(node, help);
    }

    pub fn date_created(&self) -> &str {
        self.date_field("created")
    }

    pub fn set_date_created(&mut self, date: &str) {
        self.set_date_field("created", date);
    }

    pub fn date_modified(&self) -> &str {
        self.date_field("modified")
    }

    pub fn set_date_modified(&mut self, date: &str) {
        self.set_date_field("modified", date);
    }

    /// Stamp `date/modified` with the current UTC time.
    pub fn set_modified_now(&mut self) {
        let now = Self::timestamp();
        self.set_date_modified(&now);
    }

    fn timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    // Generic sequence operations over typed handles.

    /// Advance to the next element of the same run, `None` past the end.
    pub fn next_in_sequence<T: SequenceElement>(&self, item: &T) -> Result<Option<T>, SequenceError> {
        Ok(sequence::next(&self.tree, item.node())?.map(T::from_node))
    }

    /// Retreat to the previous element of the same run, `None` past the start.
    pub fn previous_in_sequence<T: SequenceElement>(
        &self,
        item: &T,
    ) -> Result<Option<T>, SequenceError> {
        Ok(sequence::previous(&self.tree, item.node())?.map(T::from_node))
    }

    /// Detach an element from its run without destroying other members.
    /// The element stays readable until dropped or reattached.
    pub fn remove_from_sequence<T: SequenceElement>(
        &mut self,
        item: T,
    ) -> Result<Detached, SequenceError> {
        sequence::detach(&mut self.tree, item.node())
    }

    /// Relocate `item` to immediately precede `before` within the same run
    /// (end of run when `None`).
    pub fn move_in_sequence<T: SequenceElement>(
        &mut self,
        item: &T,
        before: Option<&T>,
    ) -> Result<(), SequenceError> {
        sequence::move_before(&mut self.tree, item.node(), before.map(|b| b.node()))
    }

    /// Swap with the immediately preceding element of the run.
    pub fn move_up<T: SequenceElement>(&mut self, item: &T) -> Result<(), SequenceError> {
        sequence::move_up(&mut self.tree, item.node())
    }

    /// Swap with the immediately following element of the run.
    pub fn move_down<T: SequenceElement>(&mut self, item: &T) -> Result<(), SequenceError> {
        sequence::move_down(&mut self.tree, item.node())
    }

    // Internal tree plumbing for sibling modules.

    pub(crate) fn tree(&self) -> &Tree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub(crate) fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub(crate) fn field(&self, tag: &str) -> &str {
        match self.tree.child_by_tag(self.tree.root(), tag) {
            Some(node) => self.tree.text(node),
            None => "",
        }
    }

    pub(crate) fn set_field(&mut self, tag: &str, value: &str) {
        let root = self.tree.root();
        let node = self.ensure_child(root, tag);
        self.tree.set_text(node, value);
    }

    fn date_field(&self, tag: &str) -> &str {
        self.tree
            .child_by_tag(self.tree.root(), "date")
            .and_then(|date| self.tree.child_by_tag(date, tag))
            .map(|node| self.tree.text(node))
            .unwrap_or("")
    }

    fn set_date_field(&mut self, tag: &str, value: &str) {
        let root = self.tree.root();
        let date = self.ensure_child(root, "date");
        let node = self.ensure_child(date, tag);
        self.tree.set_text(node, value);
    }

    pub(crate) fn ensure_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        if let Some(node) = self.tree.child_by_tag(parent, tag) {
            return node;
        }
        let node = self.tree.create_element(tag);
        let _ = self.tree.append_child(parent, node);
        node
    }

    /// Observational equality: same fields, same sequence order.
    pub fn tree_eq(&self, other: &Document) -> bool {
        self.tree
            .subtree_eq(self.tree.root(), &other.tree, other.tree.root())
    }
}
