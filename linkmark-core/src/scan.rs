use crate::document::{LinkDocument, ScanFailure};
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use linkmark_classifier::{
    AnchorElement, Classification, ClassificationResult, ClassifierConfig, LinkClassifier,
};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Where the document to annotate comes from
pub enum DocumentSource {
    /// A local HTML file, classified as if it were served from `location`
    File { path: PathBuf, location: Url },
    /// A page fetched over HTTP; its final URL becomes the location
    Url(Url),
}

/// Options for configuring a scan
pub struct ScanOptions {
    pub source: DocumentSource,
    pub selector: String,
    pub config: ClassifierConfig,
    pub timeout_secs: u64,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub location: String,
    pub base: String,
    pub context_host: String,
    pub results: Vec<ClassificationResult>,
    pub failures: Vec<ScanFailure>,
    pub elements: Vec<AnchorElement>,
}

impl ScanOutcome {
    pub fn total(&self) -> usize {
        self.elements.len()
    }

    pub fn internal_count(&self) -> usize {
        self.count(Classification::Internal)
    }

    pub fn external_count(&self) -> usize {
        self.count(Classification::External)
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Distinct hosts of external links, sorted
    pub fn external_hosts(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.classification == Classification::External)
            .filter_map(|r| {
                if r.link_host.is_empty() {
                    // mailto:, javascript: and friends
                    Url::parse(&r.resolved_url)
                        .ok()
                        .map(|url| format!("{}:", url.scheme()))
                } else {
                    Some(r.link_host.clone())
                }
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn count(&self, classification: Classification) -> usize {
        self.results
            .iter()
            .filter(|r| r.classification == classification)
            .count()
    }
}

pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("linkmark/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .context("Failed to create HTTP client")
}

/// Fetch a page. Returns the body and the URL it was finally served from.
pub async fn fetch_document(client: &Client, url: &Url) -> Result<(String, Url)> {
    debug!("Fetching {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{} returned HTTP {}", url, status.as_u16());
    }

    let final_url = response.url().clone();
    let is_html = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("text/html"))
        .unwrap_or(false);
    if !is_html {
        warn!("{} is not served as text/html, parsing anyway", final_url);
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", final_url))?;

    Ok((body, final_url))
}

pub async fn load_document(source: &DocumentSource, timeout_secs: u64) -> Result<(String, Url)> {
    match source {
        DocumentSource::File { path, location } => {
            let html = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok((html, location.clone()))
        }
        DocumentSource::Url(url) => {
            let client = build_client(timeout_secs)?;
            fetch_document(&client, url).await
        }
    }
}

/// Parse `html`, classify its links as seen from `location`, and collect
/// the annotated elements.
pub fn scan_html(
    html: &str,
    location: Url,
    selector: &str,
    config: ClassifierConfig,
) -> Result<ScanOutcome> {
    let classifier = LinkClassifier::with_config(config)?;
    let mut document = LinkDocument::parse(html, selector)?;
    let context = document.context(location);

    let annotation = document.annotate(&classifier, &context);

    Ok(ScanOutcome {
        location: context.location().to_string(),
        base: context.base().to_string(),
        context_host: context.host().to_string(),
        results: annotation.results,
        failures: annotation.failures,
        elements: document.into_elements(),
    })
}

/// Execute a scan with the given options
pub async fn execute_scan(options: ScanOptions) -> Result<ScanOutcome> {
    let ScanOptions {
        source,
        selector,
        config,
        timeout_secs,
        show_progress,
    } = options;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("Invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Loading document...");
        Some(pb)
    } else {
        None
    };

    let loaded = load_document(&source, timeout_secs).await;
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }
    let (html, location) = loaded?;

    info!("Classifying links of {} with '{}'", location, selector);
    let outcome = scan_html(&html, location, &selector, config)?;
    info!(
        "Scan complete: {} internal, {} external, {} failed",
        outcome.internal_count(),
        outcome.external_count(),
        outcome.failed_count()
    );

    Ok(outcome)
}
