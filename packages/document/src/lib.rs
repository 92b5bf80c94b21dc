//! # Seisflow Document Engine
//!
//! Versioned, schema-validated tree documents for seismic-processing
//! workflows: a [`Flow`] describes an ordered chain of programs, a [`Line`]
//! groups flows, a [`Project`] groups lines.
//!
//! The engine provides:
//! - a uniform [Sequence Protocol](sequence) over every ordered run of
//!   same-tag sibling nodes (programs, parameters, dictionary entries, enum
//!   options, line/project references, group instances);
//! - a stepwise [schema migration engine](migration) that upgrades documents
//!   saved under older format versions;
//! - a cross-document [dictionary manager](dictionary) with merge/split
//!   semantics and keyword canonicalization;
//! - nested, repeatable [parameter groups](group) with instance management.

pub mod config;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod flow;
pub mod group;
pub mod line;
pub mod migration;
pub mod parameter;
pub mod project;
pub mod schema;
pub mod sequence;

#[cfg(test)]
mod tests_dictionary;
#[cfg(test)]
mod tests_migration;
#[cfg(test)]
mod tests_roundtrip;

pub use config::DocumentConfig;
pub use dictionary::{canonize_dict_parameters, merge_dicts, split_dict, DictEntry, Dictionary, NameMap};
pub use document::{Document, DocumentKind};
pub use error::{DocumentError, DocumentResult};
pub use flow::{Flow, FlowIo, Program, ProgramStatus};
pub use group::Group;
pub use line::{Line, LineFlow, LinePath};
pub use migration::{MigrationStep, MigrationTable};
pub use parameter::{EnumOption, Parameter, ParameterType, ParameterValue, Parameters};
pub use project::{Project, ProjectLine};
pub use sequence::{SequenceElement, SequenceError};
