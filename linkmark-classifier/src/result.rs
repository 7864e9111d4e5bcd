use crate::element::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Internal,
    External,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Internal => "internal",
            Classification::External => "external",
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Classification::Internal)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a classification computed for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub element: ElementId,
    pub href: String,
    pub resolved_url: String,
    pub link_host: String,
    pub context_host: String,
    pub classification: Classification,
    pub marker: String,
}
