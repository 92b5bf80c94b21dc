use thiserror::Error;

pub type DomResult<T> = Result<T, DomError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("XML error at byte {pos}: {message}")]
    Parse { pos: usize, message: String },

    #[error("Document embeds a DOCTYPE declaration")]
    DoctypeDeclared,

    #[error("Document has no root element")]
    NoRootElement,

    #[error("The root element cannot be detached")]
    RootDetach,

    #[error("Node is already attached to a parent")]
    AlreadyAttached,

    #[error("Reference node is not a child of the given parent")]
    NotAChild,
}

impl DomError {
    pub fn parse(pos: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            pos,
            message: message.into(),
        }
    }
}
