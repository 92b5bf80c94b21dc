use crate::sequence::SequenceError;
use seisflow_common::Version;
use seisflow_dom::DomError;
use std::path::PathBuf;
use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Cannot access file {path}: {source}")]
    CantAccessFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Document embeds its own schema reference")]
    DtdSpecified,

    #[error("Cannot access schema descriptor {0}")]
    CantAccessDtd(PathBuf),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Document version {declared} is newer than the current {current}")]
    NewerVersion { declared: Version, current: Version },

    #[error("Expected a {expected} document, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Group operation is only valid relative to the master instance")]
    NotMasterInstance,

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("Tree error: {0}")]
    Dom(#[from] DomError),
}

impl DocumentError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }
}
