// Tests for report generation

use linkmark_classifier::ClassifierConfig;
use linkmark_core::document::DEFAULT_LINK_SELECTOR;
use linkmark_core::report::{
    ReportFormat, gather_report_data, generate_json_report, generate_text_report, save_report,
};
use linkmark_core::scan::{ScanOutcome, scan_html};
use tempfile::TempDir;
use url::Url;

const PAGE: &str = r#"<html><body>
    <a href="/about">About us</a>
    <a href="https://github.com/trapdoorsec">Source</a>
    <a href="http://[broken">Broken</a>
</body></html>"#;

fn sample_outcome() -> ScanOutcome {
    scan_html(
        PAGE,
        Url::parse("https://example.com/index.html").unwrap(),
        DEFAULT_LINK_SELECTOR,
        ClassifierConfig::default(),
    )
    .unwrap()
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("csv"), None);
}

// ============================================================================
// Report Data Tests
// ============================================================================

#[test]
fn test_gather_report_data_summary() {
    let data = gather_report_data(&sample_outcome());

    assert_eq!(data.context_host, "example.com");
    assert_eq!(data.summary.total, 3);
    assert_eq!(data.summary.internal, 1);
    assert_eq!(data.summary.external, 1);
    assert_eq!(data.summary.failed, 1);
    assert_eq!(data.external_hosts, vec!["github.com"]);
}

#[test]
fn test_gather_report_data_links_carry_text() {
    let data = gather_report_data(&sample_outcome());

    assert_eq!(data.links.len(), 2);
    assert_eq!(data.links[0].text, "About us");
    assert_eq!(data.links[0].classification, "internal");
    assert_eq!(data.links[0].marker, "internal-link");
    assert_eq!(data.links[1].resolved_url, "https://github.com/trapdoorsec");
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_sections() {
    let report = generate_text_report(&gather_report_data(&sample_outcome()));

    assert!(report.contains("LINKMARK LINK REPORT"));
    assert!(report.contains("Location:     https://example.com/index.html"));
    assert!(report.contains("  Internal:   1"));
    assert!(report.contains("• github.com"));
    assert!(report.contains("[internal] /about -> https://example.com/about"));
    assert!(report.contains("FAILURES"));
    assert!(report.contains("Invalid link target"));
}

#[test]
fn test_text_report_without_failures_omits_section() {
    let outcome = scan_html(
        r#"<a href="/only">only</a>"#,
        Url::parse("https://example.com/").unwrap(),
        DEFAULT_LINK_SELECTOR,
        ClassifierConfig::default(),
    )
    .unwrap();
    let report = generate_text_report(&gather_report_data(&outcome));

    assert!(!report.contains("FAILURES"));
    assert!(!report.contains("External hosts"));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_structure() {
    let json = generate_json_report(&gather_report_data(&sample_outcome())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "linkmark");
    assert_eq!(report["document"]["host"], "example.com");
    assert_eq!(report["summary"]["external"], 1);
    assert_eq!(report["links"].as_array().unwrap().len(), 2);
    assert_eq!(report["failures"][0]["kind"], "invalid-link-target");
    assert_eq!(report["failures"][0]["href"], "http://[broken");
}

#[test]
fn test_save_report() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("report.txt");

    save_report("hello", &path)?;
    assert_eq!(std::fs::read_to_string(&path)?, "hello");

    Ok(())
}
