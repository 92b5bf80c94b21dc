use crate::error::{DomError, DomResult};

/// Opaque handle to a node inside one [`Tree`].
///
/// Handles are only meaningful against the tree that issued them; mixing
/// handles across trees is a caller error (see `import` for the supported way
/// to carry a subtree from one tree into another).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node detached from its parent, pending reattachment or drop.
///
/// Replaces the ref-counted "remove now, relocate later" idiom with an
/// explicit two-phase transfer: `detach` hands ownership of the subtree to
/// the caller, `reattach` consumes it. Dropping a `Detached` abandons the
/// subtree (it stays in the arena, unreachable, and is freed with the tree).
#[derive(Debug)]
#[must_use = "a detached subtree is lost unless reattached"]
pub struct Detached(pub(crate) NodeId);

impl Detached {
    /// The detached node, still readable through the owning tree.
    pub fn id(&self) -> NodeId {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    cdata: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            text: String::new(),
            cdata: false,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Arena-backed element tree.
///
/// Nodes are never individually freed; detached subtrees stay in the arena
/// until the whole tree is dropped, which keeps every issued [`NodeId`]
/// stable for the lifetime of the tree. `Clone` deep-copies the arena, so a
/// cloned tree shares nothing with its source.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree with a single root element.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node::new(root_tag)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Create an unattached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(tag));
        id
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child with the given tag.
    pub fn child_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).tag == tag)
    }

    /// All children with the given tag, in document order.
    pub fn children_by_tag<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |&c| self.node(c).tag == tag)
    }

    /// Position of `id` among its parent's children.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// Next sibling carrying the same tag, if any.
    pub fn next_sibling_same_tag(&self, id: NodeId) -> Option<NodeId> {
        self.sibling_same_tag(id, 1)
    }

    /// Previous sibling carrying the same tag, if any.
    pub fn prev_sibling_same_tag(&self, id: NodeId) -> Option<NodeId> {
        self.sibling_same_tag(id, -1)
    }

    fn sibling_same_tag(&self, id: NodeId, direction: isize) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let siblings = &self.node(parent).children;
        let tag = &self.node(id).tag;
        let start = siblings.iter().position(|&c| c == id)?;
        let mut pos = start as isize + direction;
        while pos >= 0 && (pos as usize) < siblings.len() {
            let candidate = siblings[pos as usize];
            if &self.node(candidate).tag == tag {
                return Some(candidate);
            }
            pos += direction;
        }
        None
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let node = self.node_mut(id);
        match node.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => node.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).attributes.retain(|(k, _)| k != name);
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        &self.node(id).attributes
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let node = self.node_mut(id);
        node.text = text.to_string();
        node.cdata = false;
    }

    /// Set text content stored as a CDATA section on write.
    pub fn set_cdata(&mut self, id: NodeId, text: &str) {
        let node = self.node_mut(id);
        node.text = text.to_string();
        node.cdata = true;
    }

    pub fn is_cdata(&self, id: NodeId) -> bool {
        self.node(id).cdata
    }

    pub(crate) fn set_cdata_flag(&mut self, id: NodeId, cdata: bool) {
        self.node_mut(id).cdata = cdata;
    }

    pub(crate) fn push_text(&mut self, id: NodeId, text: &str) {
        self.node_mut(id).text.push_str(text);
    }

    /// Append an unattached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert an unattached node under `parent`, immediately before `before`
    /// (or as last child when `before` is `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> DomResult<()> {
        if self.node(child).parent.is_some() {
            return Err(DomError::AlreadyAttached);
        }
        let index = match before {
            Some(anchor) => self
                .node(parent)
                .children
                .iter()
                .position(|&c| c == anchor)
                .ok_or(DomError::NotAChild)?,
            None => self.node(parent).children.len(),
        };
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Detach a node from its parent, returning ownership of the subtree.
    pub fn detach(&mut self, id: NodeId) -> DomResult<Detached> {
        let parent = self.node(id).parent.ok_or(DomError::RootDetach)?;
        self.node_mut(parent).children.retain(|&c| c != id);
        self.node_mut(id).parent = None;
        Ok(Detached(id))
    }

    /// Reattach a previously detached subtree under `parent`.
    pub fn reattach(
        &mut self,
        detached: Detached,
        parent: NodeId,
        before: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let id = detached.0;
        self.insert_before(parent, id, before)?;
        Ok(id)
    }

    /// Detach a node and abandon its subtree.
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        let _ = self.detach(id)?;
        Ok(())
    }

    /// Deep-copy a subtree within this tree. The copy is unattached.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let mut node = self.node(id).clone();
        node.parent = None;
        let children = std::mem::take(&mut node.children);
        let copy = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.node_mut(copy).children.push(child_copy);
            self.node_mut(child_copy).parent = Some(copy);
        }
        copy
    }

    /// Import a subtree from another tree. The copy is unattached in `self`.
    pub fn import(&mut self, source: &Tree, id: NodeId) -> NodeId {
        let mut node = source.node(id).clone();
        node.parent = None;
        node.children.clear();
        let copy = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        for &child in &source.node(id).children {
            let child_copy = self.import(source, child);
            self.node_mut(copy).children.push(child_copy);
            self.node_mut(child_copy).parent = Some(copy);
        }
        copy
    }

    /// Structural equality of two subtrees, ignoring arena identity.
    pub fn subtree_eq(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        let a = self.node(id);
        let b = other.node(other_id);
        a.tag == b.tag
            && a.attributes == b.attributes
            && a.text == b.text
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(&b.children)
                .all(|(&x, &y)| self.subtree_eq(x, other, y))
    }
}
