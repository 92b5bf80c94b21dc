//! Parameters collections and polymorphic parameters.
//!
//! A `<parameters>` element holds an ordered run of `<parameter>` elements.
//! A parameter is either a scalar program parameter (string/int/float/range/
//! file/flag/enum) or a repeatable group (see [`crate::group`]). Scalars own
//! zero or more `<value>` elements (list-valued when a separator is set) and,
//! for enums, an ordered run of `<option>` elements.

use crate::document::Document;
use crate::sequence::SequenceElement;
use seisflow_dom::NodeId;

/// Parameter variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    String,
    Int,
    Float,
    Range,
    File,
    Flag,
    Enum,
    Group,
}

impl ParameterType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Int => "int",
            ParameterType::Float => "float",
            ParameterType::Range => "range",
            ParameterType::File => "file",
            ParameterType::Flag => "flag",
            ParameterType::Enum => "enum",
            ParameterType::Group => "group",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "string" => Some(ParameterType::String),
            "int" => Some(ParameterType::Int),
            "float" => Some(ParameterType::Float),
            "range" => Some(ParameterType::Range),
            "file" => Some(ParameterType::File),
            "flag" => Some(ParameterType::Flag),
            "enum" => Some(ParameterType::Enum),
            "group" => Some(ParameterType::Group),
            _ => None,
        }
    }
}

/// Handle to a `<parameters>` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters(pub(crate) NodeId);

impl SequenceElement for Parameters {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl Parameters {
    pub fn parameters(&self, doc: &Document) -> Vec<Parameter> {
        doc.tree()
            .children_by_tag(self.0, "parameter")
            .map(Parameter)
            .collect()
    }

    pub fn len(&self, doc: &Document) -> usize {
        doc.tree().children_by_tag(self.0, "parameter").count()
    }

    pub fn is_empty(&self, doc: &Document) -> bool {
        self.len(doc) == 0
    }

    /// Append a parameter of the given type with its mandatory skeleton.
    pub fn append_parameter(&self, doc: &mut Document, ptype: ParameterType) -> Parameter {
        let tree = doc.tree_mut();
        let node = tree.create_element("parameter");
        tree.set_attribute(node, "type", ptype.as_str());
        let _ = tree.append_child(self.0, node);
        let label = tree.create_element("label");
        let _ = tree.append_child(node, label);

        match ptype {
            ParameterType::Group => {
                let template = tree.create_element("template");
                let _ = tree.append_child(node, template);
                let template_parameters = tree.create_element("parameters");
                let _ = tree.append_child(template, template_parameters);
                // Instances ≥ 1 always: the master instance is born with the group.
                let master = tree.create_element("parameters");
                let _ = tree.append_child(node, master);
            }
            _ => {
                let keyword = tree.create_element("keyword");
                let _ = tree.append_child(node, keyword);
            }
        }
        Parameter(node)
    }
}

/// Handle to one `<parameter>` element, scalar or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter(pub(crate) NodeId);

impl SequenceElement for Parameter {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl Parameter {
    pub fn ptype(&self, doc: &Document) -> ParameterType {
        doc.tree()
            .attribute(self.0, "type")
            .and_then(ParameterType::from_name)
            .unwrap_or(ParameterType::String)
    }

    pub fn is_group(&self, doc: &Document) -> bool {
        self.ptype(doc) == ParameterType::Group
    }

    pub fn label<'a>(&self, doc: &'a Document) -> &'a str {
        self.child_text(doc, "label")
    }

    pub fn set_label(&self, doc: &mut Document, label: &str) {
        self.set_child_text(doc, "label", label);
    }

    pub fn keyword<'a>(&self, doc: &'a Document) -> &'a str {
        self.child_text(doc, "keyword")
    }

    pub fn set_keyword(&self, doc: &mut Document, keyword: &str) {
        self.set_child_text(doc, "keyword", keyword);
    }

    /// First value, `""` when none is set.
    pub fn value<'a>(&self, doc: &'a Document) -> &'a str {
        self.child_text(doc, "value")
    }

    pub fn set_value(&self, doc: &mut Document, value: &str) {
        self.set_child_text(doc, "value", value);
    }

    /// All values, in order, for list-valued parameters.
    pub fn values(&self, doc: &Document) -> Vec<ParameterValue> {
        doc.tree()
            .children_by_tag(self.0, "value")
            .map(ParameterValue)
            .collect()
    }

    pub fn append_value(&self, doc: &mut Document, value: &str) -> ParameterValue {
        let tree = doc.tree_mut();
        let node = tree.create_element("value");
        tree.set_text(node, value);
        let _ = tree.append_child(self.0, node);
        ParameterValue(node)
    }

    pub fn required(&self, doc: &Document) -> bool {
        doc.tree().attribute(self.0, "required") == Some("yes")
    }

    pub fn set_required(&self, doc: &mut Document, required: bool) {
        doc.tree_mut()
            .set_attribute(self.0, "required", if required { "yes" } else { "no" });
    }

    /// List separator; a parameter with a separator is list-valued.
    pub fn separator<'a>(&self, doc: &'a Document) -> Option<&'a str> {
        doc.tree().attribute(self.0, "separator")
    }

    pub fn set_separator(&self, doc: &mut Document, separator: &str) {
        doc.tree_mut().set_attribute(self.0, "separator", separator);
    }

    /// Ordered enum options.
    pub fn options(&self, doc: &Document) -> Vec<EnumOption> {
        doc.tree()
            .children_by_tag(self.0, "option")
            .map(EnumOption)
            .collect()
    }

    pub fn append_option(&self, doc: &mut Document, value: &str, label: &str) -> EnumOption {
        let tree = doc.tree_mut();
        let node = tree.create_element("option");
        tree.set_attribute(node, "value", value);
        tree.set_text(node, label);
        let _ = tree.append_child(self.0, node);
        EnumOption(node)
    }

    fn child_text<'a>(&self, doc: &'a Document, tag: &str) -> &'a str {
        match doc.tree().child_by_tag(self.0, tag) {
            Some(node) => doc.tree().text(node),
            None => "",
        }
    }

    fn set_child_text(&self, doc: &mut Document, tag: &str, text: &str) {
        let node = doc.ensure_child(self.0, tag);
        doc.tree_mut().set_text(node, text);
    }
}

/// One option of an enum parameter: a stored value plus a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumOption(pub(crate) NodeId);

impl SequenceElement for EnumOption {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl EnumOption {
    pub fn value<'a>(&self, doc: &'a Document) -> &'a str {
        doc.tree().attribute(self.0, "value").unwrap_or("")
    }

    pub fn label<'a>(&self, doc: &'a Document) -> &'a str {
        doc.tree().text(self.0)
    }
}

/// One `<value>` of a list-valued parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterValue(pub(crate) NodeId);

impl SequenceElement for ParameterValue {
    fn node(&self) -> NodeId {
        self.0
    }
    fn from_node(id: NodeId) -> Self {
        Self(id)
    }
}

impl ParameterValue {
    pub fn text<'a>(&self, doc: &'a Document) -> &'a str {
        doc.tree().text(self.0)
    }

    pub fn set_text(&self, doc: &mut Document, value: &str) {
        doc.tree_mut().set_text(self.0, value);
    }
}
