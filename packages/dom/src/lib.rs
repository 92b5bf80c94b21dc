//! # Tree Backing Store
//!
//! Arena-backed mutable element tree with XML parse/serialize.
//!
//! This package is the only place raw XML and raw node storage are handled.
//! Everything above it (documents, sequences, dictionaries) works through
//! opaque [`NodeId`] handles and the operations on [`Tree`]:
//! node creation, attribute get/set, text/CDATA content, insertion before a
//! sibling, two-phase detach/reattach, cross-tree subtree import, and
//! serialization.

pub mod error;
pub mod reader;
pub mod tree;
pub mod writer;

pub use error::{DomError, DomResult};
pub use reader::parse;
pub use tree::{Detached, NodeId, Tree};
pub use writer::to_xml;
