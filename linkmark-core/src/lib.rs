pub mod document;
pub mod report;
pub mod scan;

use colored::Colorize;

/// Written to stderr so piped reports are not disturbed.
pub fn print_banner() {
    eprintln!(
        "{} {}",
        "linkmark".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("{}", "internal / external link marker".bright_black());
    eprintln!();
}
