//! Document ingestion: uploaded files to plain text for prompting.

pub mod pdf;

pub use pdf::{extract_pdf_text, normalize_whitespace};
