// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_classifier_config, classify_hrefs, load_options_file, parse_host_match,
    parse_location, resolve_document_source,
};

// Re-export scan functionality from linkmark-core
pub use linkmark_core::scan::{DocumentSource, ScanOptions, ScanOutcome, execute_scan};
