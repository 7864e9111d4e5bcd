pub mod classifier;
pub mod config;
pub mod context;
pub mod element;
pub mod error;
pub mod result;

pub use classifier::{ClassifierInstance, LinkClassifier, classify_href};
pub use config::{ClassifierConfig, ClassifierOptions, HostMatch};
pub use context::BrowsingContext;
pub use element::{AnchorElement, ElementId, LinkElement};
pub use error::ClassifyError;
pub use result::{Classification, ClassificationResult};
