use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkmark")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkmark")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("classify")
                .about("Classify one or more hrefs as internal or external to a page")
                .arg(
                    arg!(-c --"context" <URL>)
                        .required(true)
                        .help("Location of the page the links appear on")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"base" <URL>)
                        .required(false)
                        .help("Base URL relative hrefs resolve against, as a <base href> would set it"),
                )
                .arg(
                    arg!(--"host-match" <POLICY>)
                        .required(false)
                        .help("How hosts are compared")
                        .value_parser(["ignore-case", "exact", "hostname-only"])
                        .default_value("ignore-case"),
                )
                .arg(
                    arg!(<HREF> ...)
                        .required(true)
                        .help("The href values to classify"),
                ),
        )
        .subcommand(
            command!("scan")
                .about(
                    "Mark every link of an HTML document as internal or external and report \
                the result.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Fetch the page at this URL and classify its links")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("input"),
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Path to a local HTML file")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-l --"location" <URL>)
                        .required(false)
                        .help("Location the local file is served from (default: its file:// URL)")
                        .requires("input"),
                )
                .arg(
                    arg!(-s --"selector" <SELECTOR>)
                        .required(false)
                        .help("CSS selector for the link elements")
                        .default_value("a[href]"),
                )
                .arg(
                    arg!(--"config" <PATH>)
                        .required(false)
                        .help("JSON file with classifier options (unknown keys are ignored)"),
                )
                .arg(
                    arg!(--"internal-marker" <MARKER>)
                        .required(false)
                        .help("Marker applied to internal links (default: internal-link)"),
                )
                .arg(
                    arg!(--"external-marker" <MARKER>)
                        .required(false)
                        .help("Marker applied to external links (default: external-link)"),
                )
                .arg(
                    arg!(--"host-match" <POLICY>)
                        .required(false)
                        .help("How hosts are compared (default: ignore-case)")
                        .value_parser(["ignore-case", "exact", "hostname-only"]),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds when fetching a URL")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                ),
        )
}
