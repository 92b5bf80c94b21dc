//! Flow documents: an ordered chain of programs plus I/O redirection.

use crate::config::DocumentConfig;
use crate::document::{Document, DocumentKind};
use crate::error::{DocumentError, DocumentResult};
use crate::parameter::Parameters;
use crate::sequence::SequenceElement;
use seisflow_dom::NodeId;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// A workflow document describing an ordered chain of [`Program`]s.
#[derive(Debug, Clone)]
pub struct Flow {
    doc: Document,
}

impl Flow {
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            doc: Document::new(DocumentKind::Flow, config),
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

    // Categories.

    pub fn categories(&self) -> Vec<String> {
        self.doc
            .tree()
            .children_by_tag(self.doc.root(), "category")
            .map(|c| self.doc.tree().text(c).to_string())
            .collect()
    }

    /// Append a category tag. Already-present categories are not duplicated.
    pub fn append_category(&mut self, name: &str) {
        if self.categories().iter().any(|c| c == name) {
            return;
        }
        let root = self.doc.root();
        // Categories sit immediately before the io block.
        let io = self.doc.tree().child_by_tag(root, "io");
        let tree = self.doc.tree_mut();
        let node = tree.create_element("category");
        tree.set_text(node, name);
        let _ = tree.insert_before(root, node, io);
    }

    pub fn remove_category(&mut self, name: &str) -> bool {
        let root = self.doc.root();
        let found = self
            .doc
            .tree()
            .children_by_tag(root, "category")
            .find(|&c| self.doc.tree().text(c) == name);
        match found {
            Some(node) => self.doc.tree_mut().remove(node).is_ok(),
            None => false,
        }
    }

    /// The three fixed I/O redirection targets.
    pub fn io(&self) -> FlowIo {
        match self.doc.tree().child_by_tag(self.doc.root(), "io") {
            Some(node) => FlowIo(node),
            // Current schemas require the io block; reachable only on a
            // hand-built tree.
            None => FlowIo(self.doc.root()),
        }
    }

    // Programs.

    pub fn programs(&self) -> Vec<Program> {
        self.doc
            .tree()
            .children_by_tag(self.doc.root(), "program")
            .map(Program)
            .collect()
    }

    pub fn program_count(&self) -> usize {
        self.doc
            .tree()
            .children_by_tag(self.doc.root(), "program")
            .count()
    }

    /// Append a new unconfigured program with its mandatory skeleton.
    pub fn append_program(&mut self) -> Program {
        let root = self.doc.root();
        let tree = self.doc.tree_mut();
        let node = tree.create_element("program");
        tree.set_attribute(node, "status", ProgramStatus::Unconfigured.as_str());
        for attr in ["stdin", "stdout", "stderr"] {
            tree.set_attribute(node, attr, "no");
        }
        let _ = tree.append_child(root, node);
        for tag in ["title", "binary", "description"] {
            let child = tree.create_element(tag);
            let _ = tree.append_child(node, child);
        }
        let help = tree.create_element("help");
        tree.set_cdata(help, "");
        let _ = tree.append_child(node, help);
        let parameters = tree.create_element("parameters");
        let _ = tree.append_child(node, parameters);
        Program(node)
    }

    /// Clear the flow's help and every program's help, e.g. before cloning a
    /// flow for remote dispatch.
    pub fn strip_help(&mut self) {
        self.doc.set_help("");
        for program in self.programs() {
            program.set_help(self, "");
        }
    }
}

impl TryFrom<Document> for Flow {
    type Error = DocumentError;

    fn try_from(doc: Document) -> DocumentResult<Self> {
        match doc.kind() {
            DocumentKind::Flow => Ok(Self { doc }),
            other => Err(DocumentError::WrongKind {
                expected: "flow",
                found: other.root_tag(),
            }),
        }
    }
}

impl Deref for Flow {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.doc
    }
}

impl DerefMut for Flow {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.doc
    }
}

/// The fixed standard input/output/error redirection targets of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowIo(pub(crate) NodeId);

impl FlowIo {
    pub fn input<'a>(&self, flow: &'a Flow) -> &'a str {
        self.target(flow, "input")
    }

    pub fn set_input(&self, flow: &mut Flow, path: &str) {
        self.set_target(flow, "input", path);
    }

    pub fn output<'a>(&self, flow: &'a Flow) -> &'a str {
        self.target(flow, "output")
    }

    pub fn set_output(&self, flow: &mut Flow, path: &str) {
        self.set_target(flow, "output", path);
    }

    pub fn error<'a>(&self, flow: &'a Flow) -> &'a str {
        self.target(flow, "error")
    }

    pub fn set_error(&self, flow: &mut Flow, path: &str) {
        self.set_target(flow, "error", path);
    }

    fn target<'a>(&self, flow: &'a Flow, tag: &str) -> &'a str {
        match flow.tree().child_by_tag(self.0, tag) {
            Some(node) => flow.tree().text(node),
            None => "",
        }
    }

    fn set_target(&self, flow: &mut Flow, tag: &str, path: &str) {
        let node = flow.doc.ensure_child(self.0, tag);
        flow.doc.tree_mut().set_text(node, path);
    }
}

/// Configuration status of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramStatus {
    #[default]
    Unconfigured,
    Configured,
    Disabled,
    Unknown,
}

impl ProgramStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgramStatus::Unconfigured => "unconfigured",
            ProgramStatus::Configured => "configured",
            ProgramStatus::Disabled => "disabled",
            ProgramStatus::Unknown => "unknown",
        }
    }

    pub fn from_name(s: &str) -> Self {
        match s {
            "unconfigured" => ProgramStatus::Unconfigured,
            "configured" => ProgramStatus::Configured,
            "disabled" => ProgramStatus::Disabled,
            _ => ProgramStatus::Unknown,
        }
    }
}

/// One step of a flow. Belongs to exactly one flow by tree position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program(pub(crate) NodeId);

impl SequenceElement for Program {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl Program {
    pub fn title<'a>(&self, flow: &'a Flow) -> &'a str {
        self.child_text(flow, "title")
    }

    pub fn set_title(&self, flow: &mut Flow, title: &str) {
        self.set_child_text(flow, "title", title);
    }

    pub fn binary<'a>(&self, flow: &'a Flow) -> &'a str {
        self.child_text(flow, "binary")
    }

    pub fn set_binary(&self, flow: &mut Flow, binary: &str) {
        self.set_child_text(flow, "binary", binary);
    }

    pub fn description<'a>(&self, flow: &'a Flow) -> &'a str {
        self.child_text(flow, "description")
    }

    pub fn set_description(&self, flow: &mut Flow, description: &str) {
        self.set_child_text(flow, "description", description);
    }

    pub fn help<'a>(&self, flow: &'a Flow) -> &'a str {
        self.child_text(flow, "help")
    }

    pub fn set_help(&self, flow: &mut Flow, help: &str) {
        let node = flow.doc.ensure_child(self.0, "help");
        flow.doc.tree_mut().set_cdata(node, help);
    }

    pub fn status(&self, flow: &Flow) -> ProgramStatus {
        flow.tree()
            .attribute(self.0, "status")
            .map(ProgramStatus::from_name)
            .unwrap_or_default()
    }

    pub fn set_status(&self, flow: &mut Flow, status: ProgramStatus) {
        flow.doc
            .tree_mut()
            .set_attribute(self.0, "status", status.as_str());
    }

    /// Menu this program came from, as (origin filename, index).
    pub fn menu<'a>(&self, flow: &'a Flow) -> Option<(&'a str, usize)> {
        let origin = flow.tree().attribute(self.0, "menu-origin")?;
        let index = flow
            .tree()
            .attribute(self.0, "menu-index")
            .and_then(|i| i.parse().ok())
            .unwrap_or(0);
        Some((origin, index))
    }

    pub fn set_menu(&self, flow: &mut Flow, origin: &str, index: usize) {
        let tree = flow.doc.tree_mut();
        tree.set_attribute(self.0, "menu-origin", origin);
        tree.set_attribute(self.0, "menu-index", &index.to_string());
    }

    pub fn stdin(&self, flow: &Flow) -> bool {
        self.io_flag(flow, "stdin")
    }

    pub fn set_stdin(&self, flow: &mut Flow, enabled: bool) {
        self.set_io_flag(flow, "stdin", enabled);
    }

    pub fn stdout(&self, flow: &Flow) -> bool {
        self.io_flag(flow, "stdout")
    }

    pub fn set_stdout(&self, flow: &mut Flow, enabled: bool) {
        self.set_io_flag(flow, "stdout", enabled);
    }

    pub fn stderr(&self, flow: &Flow) -> bool {
        self.io_flag(flow, "stderr")
    }

    pub fn set_stderr(&self, flow: &mut Flow, enabled: bool) {
        self.set_io_flag(flow, "stderr", enabled);
    }

    /// The program's parameter collection.
    pub fn parameters(&self, flow: &Flow) -> Parameters {
        match flow.tree().child_by_tag(self.0, "parameters") {
            Some(node) => Parameters(node),
            None => Parameters(self.0),
        }
    }

    fn io_flag(&self, flow: &Flow, attr: &str) -> bool {
        flow.tree().attribute(self.0, attr) == Some("yes")
    }

    fn set_io_flag(&self, flow: &mut Flow, attr: &str, enabled: bool) {
        flow.doc
            .tree_mut()
            .set_attribute(self.0, attr, if enabled { "yes" } else { "no" });
    }

    fn child_text<'a>(&self, flow: &'a Flow, tag: &str) -> &'a str {
        match flow.tree().child_by_tag(self.0, tag) {
            Some(node) => flow.tree().text(node),
            None => "",
        }
    }

    fn set_child_text(&self, flow: &mut Flow, tag: &str, text: &str) {
        let node = flow.doc.ensure_child(self.0, tag);
        flow.doc.tree_mut().set_text(node, text);
    }
}
