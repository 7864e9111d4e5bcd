// Link extraction from HTML documents and batch annotation

use anyhow::{Result, anyhow};
use linkmark_classifier::{
    AnchorElement, BrowsingContext, ClassificationResult, ClassifyError, ElementId,
    LinkClassifier, LinkElement,
};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_LINK_SELECTOR: &str = "a[href]";

/// The link elements of one parsed document, in document order.
#[derive(Debug, Clone)]
pub struct LinkDocument {
    elements: Vec<AnchorElement>,
    base_href: Option<String>,
}

/// A link element the classifier refused, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub element: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub kind: String,
    pub error: String,
}

impl ScanFailure {
    fn new(element: &AnchorElement, error: &ClassifyError) -> Self {
        let kind = match error {
            ClassifyError::MissingLinkTarget { .. } => "missing-link-target",
            ClassifyError::InvalidLinkTarget { .. } => "invalid-link-target",
            ClassifyError::InvalidContext(_) => "invalid-context",
            ClassifyError::InvalidConfig(_) => "invalid-config",
        };
        Self {
            element: element.id,
            href: element.href.clone(),
            kind: kind.to_string(),
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Annotation {
    pub results: Vec<ClassificationResult>,
    pub failures: Vec<ScanFailure>,
}

impl LinkDocument {
    pub fn parse(html: &str, selector: &str) -> Result<Self> {
        let link_selector = Selector::parse(selector)
            .map_err(|e| anyhow!("Invalid selector '{}': {}", selector, e))?;
        let base_selector =
            Selector::parse("base[href]").map_err(|e| anyhow!("Invalid selector: {}", e))?;

        let document = Html::parse_document(html);

        let elements: Vec<AnchorElement> = document
            .select(&link_selector)
            .enumerate()
            .map(|(index, element)| {
                let value = element.value();
                let text = element
                    .text()
                    .flat_map(str::split_whitespace)
                    .collect::<Vec<_>>()
                    .join(" ");
                AnchorElement::new(index as u64, value.attr("href"))
                    .with_tag(value.name())
                    .with_classes(value.classes())
                    .with_text(&text)
            })
            .collect();

        let base_href = document
            .select(&base_selector)
            .next()
            .and_then(|base| base.value().attr("href"))
            .map(String::from);

        debug!(
            "Parsed document: {} elements match '{}', base href {:?}",
            elements.len(),
            selector,
            base_href
        );

        Ok(Self {
            elements,
            base_href,
        })
    }

    pub fn elements(&self) -> &[AnchorElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<AnchorElement> {
        self.elements
    }

    pub fn base_href(&self) -> Option<&str> {
        self.base_href.as_deref()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Browsing context for this document at `location`, honouring its
    /// `<base href>` when that resolves.
    pub fn context(&self, location: Url) -> BrowsingContext {
        let context = BrowsingContext::new(location);
        match self.base_href.as_deref() {
            Some(href) => match context.clone().with_base_href(href) {
                Ok(with_base) => with_base,
                Err(e) => {
                    warn!("Ignoring unusable base href: {}", e);
                    context
                }
            },
            None => context,
        }
    }

    /// Run the classifier over every element. Elements that fail are
    /// recorded and left without a marker.
    pub fn annotate(&mut self, classifier: &LinkClassifier, context: &BrowsingContext) -> Annotation {
        let mut annotation = Annotation::default();

        for element in self.elements.iter_mut() {
            match classifier.classify(element, context) {
                Ok(result) => annotation.results.push(result),
                Err(e) => {
                    warn!("Skipping element {}: {}", element.element_id(), e);
                    annotation.failures.push(ScanFailure::new(element, &e));
                }
            }
        }

        annotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>t</title></head><body>
        <nav><a class="nav home" href="/">Home</a></nav>
        <p>Read <a href="https://docs.rs/url">the
            url docs</a> or <a>nothing</a>.</p>
        <map><area href="/region" alt="r"></map>
    </body></html>"#;

    #[test]
    fn test_parse_default_selector() {
        let doc = LinkDocument::parse(PAGE, DEFAULT_LINK_SELECTOR).unwrap();
        assert_eq!(doc.len(), 2);

        let first = &doc.elements()[0];
        assert_eq!(first.id, ElementId(0));
        assert_eq!(first.href.as_deref(), Some("/"));
        assert_eq!(first.classes, vec!["nav", "home"]);
        assert_eq!(first.text, "Home");

        let second = &doc.elements()[1];
        assert_eq!(second.text, "the url docs");
    }

    #[test]
    fn test_parse_custom_selector_includes_hrefless() {
        let doc = LinkDocument::parse(PAGE, "a, area").unwrap();
        assert_eq!(doc.len(), 4);
        assert!(doc.elements().iter().any(|e| e.href.is_none()));
        assert!(doc.elements().iter().any(|e| e.tag == "area"));
    }

    #[test]
    fn test_parse_invalid_selector() {
        let err = LinkDocument::parse(PAGE, "a[").unwrap_err();
        assert!(err.to_string().contains("Invalid selector"));
    }

    #[test]
    fn test_base_href_is_captured() {
        let html = r#"<html><head><base href="https://static.example.net/"></head>
            <body><a href="x">x</a></body></html>"#;
        let doc = LinkDocument::parse(html, DEFAULT_LINK_SELECTOR).unwrap();
        assert_eq!(doc.base_href(), Some("https://static.example.net/"));

        let ctx = doc.context(Url::parse("https://example.com/").unwrap());
        assert_eq!(ctx.host(), "example.com");
        assert_eq!(ctx.base().as_str(), "https://static.example.net/");
    }

    #[test]
    fn test_unusable_base_href_is_ignored() {
        let html = r#"<html><head><base href="http://[oops"></head><body></body></html>"#;
        let doc = LinkDocument::parse(html, DEFAULT_LINK_SELECTOR).unwrap();
        let location = Url::parse("https://example.com/a/").unwrap();
        let ctx = doc.context(location.clone());
        assert_eq!(ctx.base(), &location);
    }

    #[test]
    fn test_annotate_records_failures() {
        let mut doc = LinkDocument::parse(PAGE, "a").unwrap();
        let classifier = LinkClassifier::new();
        let ctx = doc.context(Url::parse("http://example.com/").unwrap());

        let annotation = doc.annotate(&classifier, &ctx);
        assert_eq!(annotation.results.len(), 2);
        assert_eq!(annotation.failures.len(), 1);
        assert_eq!(annotation.failures[0].kind, "missing-link-target");

        let hrefless = doc.elements().iter().find(|e| e.href.is_none()).unwrap();
        assert!(hrefless.classes.is_empty());
        assert_eq!(doc.elements()[0].classes, vec!["nav", "home", "internal-link"]);
        assert_eq!(doc.elements()[1].classes, vec!["external-link"]);
    }
}
