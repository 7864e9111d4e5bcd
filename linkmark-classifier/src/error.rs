use crate::element::ElementId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Element {element} has no href attribute")]
    MissingLinkTarget { element: ElementId },

    #[error("Invalid link target '{href}': {reason}")]
    InvalidLinkTarget { href: String, reason: String },

    #[error("Invalid browsing context: {0}")]
    InvalidContext(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
