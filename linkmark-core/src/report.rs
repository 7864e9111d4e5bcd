// Report generation from scan outcomes

use crate::document::ScanFailure;
use crate::scan::ScanOutcome;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub location: String,
    pub base: String,
    pub context_host: String,
    pub summary: Summary,
    pub external_hosts: Vec<String>,
    pub links: Vec<LinkEntry>,
    pub failures: Vec<ScanFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub internal: usize,
    pub external: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEntry {
    pub element: u64,
    pub href: String,
    pub resolved_url: String,
    pub host: String,
    pub classification: String,
    pub marker: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

pub fn gather_report_data(outcome: &ScanOutcome) -> ReportData {
    let links = outcome
        .results
        .iter()
        .map(|result| {
            let text = outcome
                .elements
                .iter()
                .find(|e| e.id == result.element)
                .map(|e| e.text.clone())
                .unwrap_or_default();
            LinkEntry {
                element: result.element.0,
                href: result.href.clone(),
                resolved_url: result.resolved_url.clone(),
                host: result.link_host.clone(),
                classification: result.classification.to_string(),
                marker: result.marker.clone(),
                text,
            }
        })
        .collect();

    ReportData {
        location: outcome.location.clone(),
        base: outcome.base.clone(),
        context_host: outcome.context_host.clone(),
        summary: Summary {
            total: outcome.total(),
            internal: outcome.internal_count(),
            external: outcome.external_count(),
            failed: outcome.failed_count(),
        },
        external_hosts: outcome.external_hosts(),
        links,
        failures: outcome.failures.clone(),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push_str("                            LINKMARK LINK REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Location:     {}\n", data.location));
    if data.base != data.location {
        report.push_str(&format!("Base:         {}\n", data.base));
    }
    report.push_str(&format!("Host:         {}\n", display_host(&data.context_host)));
    report.push('\n');

    // Summary
    report.push_str(RULE);
    report.push_str("SUMMARY\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!("Links:        {}\n", data.summary.total));
    report.push_str(&format!("  Internal:   {}\n", data.summary.internal));
    report.push_str(&format!("  External:   {}\n", data.summary.external));
    report.push_str(&format!("  Failed:     {}\n", data.summary.failed));
    report.push('\n');

    if !data.external_hosts.is_empty() {
        report.push_str("External hosts:\n");
        for host in &data.external_hosts {
            report.push_str(&format!("  • {}\n", host));
        }
        report.push('\n');
    }

    // Links
    if !data.links.is_empty() {
        report.push_str(RULE);
        report.push_str("LINKS\n");
        report.push_str(RULE);
        report.push('\n');
        for link in &data.links {
            report.push_str(&format!(
                "[{:<8}] {} -> {}\n",
                link.classification, link.href, link.resolved_url
            ));
            if !link.text.is_empty() {
                report.push_str(&format!("           \"{}\"\n", link.text));
            }
        }
        report.push('\n');
    }

    if !data.failures.is_empty() {
        report.push_str(RULE);
        report.push_str("FAILURES\n");
        report.push_str(RULE);
        report.push('\n');
        for failure in &data.failures {
            report.push_str(&format!("{} {}\n", failure.element, failure.error));
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str("\nGenerated by linkmark\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "linkmark",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "document": {
                "location": data.location,
                "base": data.base,
                "host": data.context_host
            },
            "summary": data.summary,
            "external_hosts": data.external_hosts,
            "links": data.links,
            "failures": data.failures
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn display_host(host: &str) -> &str {
    if host.is_empty() { "(none)" } else { host }
}
