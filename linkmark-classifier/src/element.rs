use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle identifying an element within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything the classifier can mark: it needs an identity, an href to read,
/// and a set of markers (class names) it may add to or remove from.
pub trait LinkElement {
    fn element_id(&self) -> ElementId;

    /// The raw href attribute, `None` when the element carries none.
    fn href(&self) -> Option<&str>;

    fn has_marker(&self, marker: &str) -> bool;

    fn add_marker(&mut self, marker: &str);

    fn remove_marker(&mut self, marker: &str);
}

/// In-memory link element as extracted from a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorElement {
    pub id: ElementId,
    pub tag: String,
    pub href: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
}

impl AnchorElement {
    pub fn new(id: u64, href: Option<&str>) -> Self {
        Self {
            id: ElementId(id),
            tag: "a".to_string(),
            href: href.map(String::from),
            classes: Vec::new(),
            text: String::new(),
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for class in classes {
            let class = class.into();
            if !class.is_empty() && !self.classes.contains(&class) {
                self.classes.push(class);
            }
        }
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// The class attribute value as it would be serialized back into markup.
    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }
}

impl LinkElement for AnchorElement {
    fn element_id(&self) -> ElementId {
        self.id
    }

    fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    fn has_marker(&self, marker: &str) -> bool {
        self.classes.iter().any(|c| c == marker)
    }

    fn add_marker(&mut self, marker: &str) {
        if !self.has_marker(marker) {
            self.classes.push(marker.to_string());
        }
    }

    fn remove_marker(&mut self, marker: &str) {
        self.classes.retain(|c| c != marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_marker_is_set_like() {
        let mut element = AnchorElement::new(1, Some("/a"));
        element.add_marker("internal-link");
        element.add_marker("internal-link");
        assert_eq!(element.classes, vec!["internal-link"]);
    }

    #[test]
    fn test_remove_marker_keeps_others() {
        let mut element = AnchorElement::new(1, Some("/a")).with_classes(["nav", "internal-link"]);
        element.remove_marker("internal-link");
        assert_eq!(element.class_attr(), "nav");
    }

    #[test]
    fn test_with_classes_skips_empty_and_duplicates() {
        let element = AnchorElement::new(1, None).with_classes(["btn", "", "btn", "primary"]);
        assert_eq!(element.classes, vec!["btn", "primary"]);
    }

    #[test]
    fn test_element_id_display() {
        assert_eq!(ElementId(7).to_string(), "#7");
    }
}
