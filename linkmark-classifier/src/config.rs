use crate::context::hostname_of;
use crate::error::{ClassifyError, Result};
use crate::result::Classification;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERNAL_MARKER: &str = "internal-link";
pub const DEFAULT_EXTERNAL_MARKER: &str = "external-link";

/// How a link host is compared with the browsing context host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostMatch {
    /// ASCII case-insensitive, port significant.
    #[default]
    IgnoreCase,
    /// Byte-for-byte, port significant.
    Exact,
    /// ASCII case-insensitive, port ignored.
    HostnameOnly,
}

impl HostMatch {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ignore-case" | "ignorecase" | "default" => Some(HostMatch::IgnoreCase),
            "exact" | "strict" => Some(HostMatch::Exact),
            "hostname-only" | "hostname" => Some(HostMatch::HostnameOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostMatch::IgnoreCase => "ignore-case",
            HostMatch::Exact => "exact",
            HostMatch::HostnameOnly => "hostname-only",
        }
    }

    pub fn matches(&self, link_host: &str, context_host: &str) -> bool {
        match self {
            HostMatch::IgnoreCase => link_host.eq_ignore_ascii_case(context_host),
            HostMatch::Exact => link_host == context_host,
            HostMatch::HostnameOnly => {
                hostname_of(link_host).eq_ignore_ascii_case(hostname_of(context_host))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub internal_marker: String,
    pub external_marker: String,
    pub host_match: HostMatch,
    /// Remove the applied marker when the element's instance is destroyed.
    pub revert_on_destroy: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            internal_marker: DEFAULT_INTERNAL_MARKER.to_string(),
            external_marker: DEFAULT_EXTERNAL_MARKER.to_string(),
            host_match: HostMatch::default(),
            revert_on_destroy: false,
        }
    }
}

impl ClassifierConfig {
    pub fn with_markers(mut self, internal: &str, external: &str) -> Self {
        self.internal_marker = internal.to_string();
        self.external_marker = external.to_string();
        self
    }

    pub fn with_host_match(mut self, host_match: HostMatch) -> Self {
        self.host_match = host_match;
        self
    }

    pub fn with_revert_on_destroy(mut self, revert: bool) -> Self {
        self.revert_on_destroy = revert;
        self
    }

    /// Overlay every option that is set; unset options keep their value.
    pub fn merge(mut self, options: ClassifierOptions) -> Self {
        if let Some(marker) = options.internal_marker {
            self.internal_marker = marker;
        }
        if let Some(marker) = options.external_marker {
            self.external_marker = marker;
        }
        if let Some(host_match) = options.host_match {
            self.host_match = host_match;
        }
        if let Some(revert) = options.revert_on_destroy {
            self.revert_on_destroy = revert;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.internal_marker.trim().is_empty() {
            return Err(ClassifyError::InvalidConfig(
                "internal marker must not be empty".to_string(),
            ));
        }
        if self.external_marker.trim().is_empty() {
            return Err(ClassifyError::InvalidConfig(
                "external marker must not be empty".to_string(),
            ));
        }
        if self.internal_marker == self.external_marker {
            return Err(ClassifyError::InvalidConfig(format!(
                "internal and external markers are both '{}'",
                self.internal_marker
            )));
        }
        Ok(())
    }

    pub fn marker_for(&self, classification: Classification) -> &str {
        match classification {
            Classification::Internal => &self.internal_marker,
            Classification::External => &self.external_marker,
        }
    }
}

/// Caller supplied options. Unknown keys are ignored so option objects
/// written for other tools can be passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    #[serde(alias = "internalMarker", alias = "internalLinkClass")]
    pub internal_marker: Option<String>,
    #[serde(alias = "externalMarker", alias = "externalLinkClass")]
    pub external_marker: Option<String>,
    #[serde(alias = "hostMatch")]
    pub host_match: Option<HostMatch>,
    #[serde(alias = "revertOnDestroy")]
    pub revert_on_destroy: Option<bool>,
}

impl ClassifierOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ClassifyError::InvalidConfig(e.to_string()))
    }
}
