//! Sequence Protocol: one cursor contract over every ordered run of same-tag
//! sibling nodes.
//!
//! Sequence identity is tag name plus parent: two elements with the same tag
//! under different parents are never interchangeable. The protocol covers
//! programs in a flow, parameters in a collection, dictionary entries, enum
//! options, list values, flow/path references in a line, line references in a
//! project, and group instances.

use seisflow_dom::{Detached, NodeId, Tree};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Element is not part of a recognized sequence")]
    NotASequence,

    #[error("Elements belong to different sequences")]
    DifferentSequences,

    #[error("Sequence index out of bounds")]
    InvalidIndex,
}

/// (element tag, parent tag) pairs that form sequences.
const SEQUENCE_RUNS: &[(&str, &str)] = &[
    ("program", "flow"),
    ("category", "flow"),
    ("parameter", "parameters"),
    ("parameter", "dictionary"),
    ("option", "parameter"),
    ("value", "parameter"),
    ("parameters", "parameter"), // group instances
    ("flow", "line"),
    ("path", "line"),
    ("line", "project"),
];

/// Check that a node can be treated as a sequence element.
pub(crate) fn classify(tree: &Tree, id: NodeId) -> Result<(), SequenceError> {
    let parent = tree.parent(id).ok_or(SequenceError::NotASequence)?;
    let pair = (tree.tag(id), tree.tag(parent));
    if SEQUENCE_RUNS.iter().any(|&(tag, ptag)| pair == (tag, ptag)) {
        Ok(())
    } else {
        Err(SequenceError::NotASequence)
    }
}

pub(crate) fn next(tree: &Tree, id: NodeId) -> Result<Option<NodeId>, SequenceError> {
    classify(tree, id)?;
    Ok(tree.next_sibling_same_tag(id))
}

pub(crate) fn previous(tree: &Tree, id: NodeId) -> Result<Option<NodeId>, SequenceError> {
    classify(tree, id)?;
    Ok(tree.prev_sibling_same_tag(id))
}

/// Detach an element from its run without touching the other members.
pub(crate) fn detach(tree: &mut Tree, id: NodeId) -> Result<Detached, SequenceError> {
    classify(tree, id)?;
    tree.detach(id).map_err(|_| SequenceError::NotASequence)
}

/// Relocate `id` to immediately precede `before` within the same run, or to
/// the end of its run when `before` is `None`.
pub(crate) fn move_before(
    tree: &mut Tree,
    id: NodeId,
    before: Option<NodeId>,
) -> Result<(), SequenceError> {
    classify(tree, id)?;
    let parent = tree.parent(id).ok_or(SequenceError::NotASequence)?;

    let anchor = match before {
        Some(before) => {
            classify(tree, before)?;
            if tree.parent(before) != Some(parent) || tree.tag(before) != tree.tag(id) {
                return Err(SequenceError::DifferentSequences);
            }
            if before == id {
                return Ok(());
            }
            Some(before)
        }
        None => {
            // End of the run: just after the last same-tag sibling.
            let last = tree
                .children_by_tag(parent, tree.tag(id))
                .last()
                .ok_or(SequenceError::NotASequence)?;
            if last == id {
                return Ok(());
            }
            let next_pos = tree
                .position(last)
                .map(|p| p + 1)
                .ok_or(SequenceError::NotASequence)?;
            tree.children(parent).get(next_pos).copied()
        }
    };

    let held = tree.detach(id).map_err(|_| SequenceError::NotASequence)?;
    tree.reattach(held, parent, anchor)
        .map_err(|_| SequenceError::DifferentSequences)?;
    Ok(())
}

/// Swap with the immediately preceding same-tag sibling.
pub(crate) fn move_up(tree: &mut Tree, id: NodeId) -> Result<(), SequenceError> {
    let prev = previous(tree, id)?.ok_or(SequenceError::InvalidIndex)?;
    let parent = tree.parent(id).ok_or(SequenceError::NotASequence)?;
    let held = tree.detach(id).map_err(|_| SequenceError::NotASequence)?;
    tree.reattach(held, parent, Some(prev))
        .map_err(|_| SequenceError::InvalidIndex)?;
    Ok(())
}

/// Swap with the immediately following same-tag sibling.
pub(crate) fn move_down(tree: &mut Tree, id: NodeId) -> Result<(), SequenceError> {
    let next = next(tree, id)?.ok_or(SequenceError::InvalidIndex)?;
    let parent = tree.parent(id).ok_or(SequenceError::NotASequence)?;
    let held = tree.detach(next).map_err(|_| SequenceError::NotASequence)?;
    tree.reattach(held, parent, Some(id))
        .map_err(|_| SequenceError::InvalidIndex)?;
    Ok(())
}

/// Typed handle over a sequence-capable tree node.
///
/// Implemented by every handle type the engine hands out (programs,
/// parameters, dictionary entries, options, references, instances). The
/// methods exist so generic sequence operations can see through the wrapper;
/// they are not meant to be called directly.
pub trait SequenceElement: Copy {
    #[doc(hidden)]
    fn node(&self) -> NodeId;
    #[doc(hidden)]
    fn from_node(id: NodeId) -> Self;
}
