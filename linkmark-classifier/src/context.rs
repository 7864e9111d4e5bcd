use crate::error::{ClassifyError, Result};
use url::Url;

/// Location of the document whose links are being classified.
///
/// `host` is derived once from `location` and is what links are compared
/// against. `base` is what relative hrefs resolve against; it only differs
/// from `location` when the document declares a `<base href>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsingContext {
    location: Url,
    base: Url,
    host: String,
}

impl BrowsingContext {
    pub fn new(location: Url) -> Self {
        let host = url_host(&location);
        Self {
            base: location.clone(),
            location,
            host,
        }
    }

    pub fn parse(location: &str) -> Result<Self> {
        let location = Url::parse(location)
            .map_err(|e| ClassifyError::InvalidContext(format!("'{}': {}", location, e)))?;
        Ok(Self::new(location))
    }

    pub fn with_base(mut self, base: Url) -> Self {
        self.base = base;
        self
    }

    /// Resolve a `<base href>` value against the location and use it as base.
    pub fn with_base_href(self, href: &str) -> Result<Self> {
        let base = self
            .location
            .join(href)
            .map_err(|e| ClassifyError::InvalidContext(format!("base href '{}': {}", href, e)))?;
        Ok(self.with_base(base))
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolve an href against the base the way a browser resolves an anchor.
    pub fn resolve(&self, href: &str) -> Result<Url> {
        self.base
            .join(href)
            .map_err(|e| ClassifyError::InvalidLinkTarget {
                href: href.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Hostname plus port, the port only when it is not the scheme default.
/// Empty when the URL has no host at all (`mailto:`, `file:` and the like).
pub fn url_host(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Strip the `:port` suffix of a host string, leaving IPv6 brackets intact.
pub fn hostname_of(host: &str) -> &str {
    match host.rfind(':') {
        Some(idx) if !host[idx..].contains(']') => &host[..idx],
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_without_port() {
        let ctx = BrowsingContext::parse("http://example.com/page").unwrap();
        assert_eq!(ctx.host(), "example.com");
    }

    #[test]
    fn test_host_drops_default_port() {
        let ctx = BrowsingContext::parse("http://example.com:80/page").unwrap();
        assert_eq!(ctx.host(), "example.com");
        let ctx = BrowsingContext::parse("https://example.com:443/").unwrap();
        assert_eq!(ctx.host(), "example.com");
    }

    #[test]
    fn test_host_keeps_non_default_port() {
        let ctx = BrowsingContext::parse("https://example.com:8443/").unwrap();
        assert_eq!(ctx.host(), "example.com:8443");
    }

    #[test]
    fn test_host_is_lowercased_by_parser() {
        let ctx = BrowsingContext::parse("http://EXAMPLE.com/").unwrap();
        assert_eq!(ctx.host(), "example.com");
    }

    #[test]
    fn test_file_location_has_empty_host() {
        let ctx = BrowsingContext::parse("file:///tmp/page.html").unwrap();
        assert_eq!(ctx.host(), "");
    }

    #[test]
    fn test_invalid_location() {
        let err = BrowsingContext::parse("not a url").unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidContext(_)));
    }

    #[test]
    fn test_base_href_changes_resolution_not_host() {
        let ctx = BrowsingContext::parse("http://a.com/dir/page")
            .unwrap()
            .with_base_href("http://cdn.b.com/assets/")
            .unwrap();
        assert_eq!(ctx.host(), "a.com");
        assert_eq!(
            ctx.resolve("img.png").unwrap().as_str(),
            "http://cdn.b.com/assets/img.png"
        );
    }

    #[test]
    fn test_resolve_relative_forms() {
        let ctx = BrowsingContext::parse("http://a.com/dir/page").unwrap();
        assert_eq!(ctx.resolve("/path").unwrap().as_str(), "http://a.com/path");
        assert_eq!(ctx.resolve("path").unwrap().as_str(), "http://a.com/dir/path");
        assert_eq!(ctx.resolve("//b.com/path").unwrap().as_str(), "http://b.com/path");
    }

    #[test]
    fn test_resolve_invalid_ipv6() {
        let ctx = BrowsingContext::parse("http://a.com/").unwrap();
        let err = ctx.resolve("http://[invalid").unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidLinkTarget { .. }));
    }

    #[test]
    fn test_url_host_ipv6() {
        let url = Url::parse("http://[::1]:8080/").unwrap();
        assert_eq!(url_host(&url), "[::1]:8080");
    }

    #[test]
    fn test_hostname_of() {
        assert_eq!(hostname_of("example.com:8443"), "example.com");
        assert_eq!(hostname_of("example.com"), "example.com");
        assert_eq!(hostname_of("[::1]:8080"), "[::1]");
        assert_eq!(hostname_of("[::1]"), "[::1]");
        assert_eq!(hostname_of(""), "");
    }
}
