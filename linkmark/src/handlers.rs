use clap::ArgMatches;
use colored::Colorize;
use linkmark_classifier::{
    BrowsingContext, Classification, ClassifierConfig, ClassifierOptions, ClassifyError,
    HostMatch, classify_href,
};
use linkmark_core::report::{
    ReportFormat, gather_report_data, generate_json_report, generate_text_report, save_report,
};
use linkmark_core::scan::{DocumentSource, ScanOptions, ScanOutcome, execute_scan};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use url::Url;

// Helper functions for the handlers

/// Parse a location, trying to add http:// if the scheme is missing
pub fn parse_location(line: &str) -> Option<Url> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Try to parse as-is
    if let Ok(url) = Url::parse(line) {
        return Some(url);
    }

    // Try adding http://
    Url::parse(&format!("http://{}", line)).ok()
}

pub fn parse_host_match(value: &str) -> Result<HostMatch, String> {
    HostMatch::from_str(value).ok_or_else(|| {
        format!(
            "Unknown host match policy '{}' (expected ignore-case, exact or hostname-only)",
            value
        )
    })
}

/// Load classifier options from a JSON file, expanding a leading `~`
pub fn load_options_file(path: &str) -> Result<ClassifierOptions, String> {
    let expanded = shellexpand::tilde(path);
    let path = Path::new(expanded.as_ref());
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

    ClassifierOptions::from_json(&content)
        .map_err(|e| format!("Failed to load config file {}: {}", path.display(), e))
}

/// Defaults, then the config file, then individual flags
pub fn build_classifier_config(
    config_path: Option<&String>,
    internal_marker: Option<&String>,
    external_marker: Option<&String>,
    host_match: Option<&String>,
) -> Result<ClassifierConfig, String> {
    let mut config = ClassifierConfig::default();

    if let Some(path) = config_path {
        config = config.merge(load_options_file(path)?);
    }

    let flags = ClassifierOptions {
        internal_marker: internal_marker.cloned(),
        external_marker: external_marker.cloned(),
        host_match: host_match.map(|v| parse_host_match(v)).transpose()?,
        revert_on_destroy: None,
    };
    config = config.merge(flags);

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Work out where the document comes from
pub fn resolve_document_source(
    url: Option<&Url>,
    input: Option<&PathBuf>,
    location: Option<&String>,
) -> Result<DocumentSource, String> {
    if let Some(path) = input {
        let location = match location {
            Some(location) => parse_location(location)
                .ok_or_else(|| format!("Invalid location '{}'", location))?,
            None => {
                let absolute = fs::canonicalize(path)
                    .map_err(|e| format!("Failed to resolve {}: {}", path.display(), e))?;
                Url::from_file_path(&absolute)
                    .map_err(|_| format!("Cannot build a file URL for {}", absolute.display()))?
            }
        };
        Ok(DocumentSource::File {
            path: path.clone(),
            location,
        })
    } else if let Some(url) = url {
        Ok(DocumentSource::Url(url.clone()))
    } else {
        Err("Either --url or --input must be provided".to_string())
    }
}

/// Classify each href independently against the same context
pub fn classify_hrefs(
    context: &BrowsingContext,
    hrefs: &[String],
    config: &ClassifierConfig,
) -> Vec<(String, Result<Classification, ClassifyError>)> {
    hrefs
        .iter()
        .map(|href| (href.clone(), classify_href(href, context, config)))
        .collect()
}

fn init_tracing(quiet: bool) {
    let level = if quiet { Level::WARN } else { Level::INFO };
    // Logs go to stderr so reports on stdout stay machine readable
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

pub fn handle_classify(args: &ArgMatches) {
    let location = args.get_one::<Url>("context").unwrap();
    let base = args.get_one::<String>("base");
    let host_match = args.get_one::<String>("host-match");
    let hrefs: Vec<String> = args
        .get_many::<String>("HREF")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let config = match build_classifier_config(None, None, None, host_match) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let mut context = BrowsingContext::new(location.clone());
    if let Some(base) = base {
        context = match context.with_base_href(base) {
            Ok(context) => context,
            Err(e) => {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        };
    }

    let mut failed = false;
    for (href, result) in classify_hrefs(&context, &hrefs, &config) {
        match result {
            Ok(Classification::Internal) => {
                println!("{}  {}", "internal".green().bold(), href)
            }
            Ok(Classification::External) => {
                println!("{}  {}", "external".yellow().bold(), href)
            }
            Err(e) => {
                failed = true;
                println!("{}     {} ({})", "error".red().bold(), href, e);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn print_summary(outcome: &ScanOutcome) {
    eprintln!(
        "{} {} links on {}: {} internal, {} external, {} failed",
        "✓".green().bold(),
        outcome.total(),
        outcome.location.bright_white(),
        outcome.internal_count().to_string().green(),
        outcome.external_count().to_string().yellow(),
        outcome.failed_count().to_string().red()
    );
}

pub async fn handle_scan(args: &ArgMatches, quiet: bool) {
    init_tracing(quiet);

    let url = args.get_one::<Url>("url");
    let input = args.get_one::<PathBuf>("input");
    let location = args.get_one::<String>("location");
    let selector = args
        .get_one::<String>("selector")
        .cloned()
        .unwrap_or_else(|| "a[href]".to_string());
    let format_str = args.get_one::<String>("format").unwrap();
    let output = args.get_one::<PathBuf>("output");
    let timeout_secs = *args.get_one::<u64>("timeout").unwrap_or(&10);

    let source = match resolve_document_source(url, input, location) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let config = match build_classifier_config(
        args.get_one::<String>("config"),
        args.get_one::<String>("internal-marker"),
        args.get_one::<String>("external-marker"),
        args.get_one::<String>("host-match"),
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let format = match ReportFormat::from_str(format_str) {
        Some(format) => format,
        None => {
            eprintln!("✗ Unknown report format '{}'", format_str);
            std::process::exit(1);
        }
    };

    let outcome = match execute_scan(ScanOptions {
        source,
        selector,
        config,
        timeout_secs,
        show_progress: !quiet,
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("✗ Scan failed: {:#}", e);
            std::process::exit(1);
        }
    };

    if !quiet {
        print_summary(&outcome);
    }

    let data = gather_report_data(&outcome);
    let report = match format {
        ReportFormat::Text => generate_text_report(&data),
        ReportFormat::Json => match generate_json_report(&data) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("✗ Failed to generate JSON report: {}", e);
                std::process::exit(1);
            }
        },
    };

    match output {
        Some(path) => {
            if let Err(e) = save_report(&report, path) {
                eprintln!("✗ Failed to save report to {}: {}", path.display(), e);
                std::process::exit(1);
            }
            if !quiet {
                eprintln!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None => println!("{}", report),
    }
}
