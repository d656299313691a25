use lopdf::Document;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::TutorError;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Collapse every run of whitespace into a single space.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_run().replace_all(text, " ").into_owned()
}

/// Extract the text of every page of a PDF, in page order.
///
/// Pages without extractable text (scans, pure images) contribute nothing,
/// so an image-only PDF comes back as an empty string rather than an error.
/// Only bytes that cannot be parsed as a PDF at all are rejected.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, TutorError> {
    let document = Document::load_mem(bytes)
        .map_err(|e| TutorError::Ingestion(format!("Not a readable PDF: {}", e)))?;

    let pages = document.get_pages();
    let mut text = String::new();
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(&page_text);
                text.push(' ');
            }
            Ok(_) => debug!("Page {} has no extractable text", page_number),
            Err(e) => debug!("Skipping page {}: {}", page_number, e),
        }
    }

    let normalized = normalize_whitespace(&text);
    info!(
        "Extracted {} chars from {} PDF pages",
        normalized.len(),
        pages.len()
    );
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a minimal PDF with one text line per page.
    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        let input = "Cells\n\n divide \t\t by\r\nmitosis   ";
        let output = normalize_whitespace(input);
        assert_eq!(output, "Cells divide by mitosis ");
        assert!(!output.contains("  "));
    }

    #[test]
    fn test_normalize_whitespace_no_double_runs() {
        let inputs = ["a \u{a0}\n b", "\n\n\n", "x\t\ty", "plain"];
        for input in inputs {
            let output = normalize_whitespace(input);
            let chars: Vec<char> = output.chars().collect();
            assert!(
                chars.windows(2).all(|w| !(w[0].is_whitespace() && w[1].is_whitespace())),
                "whitespace run left in {:?}",
                output
            );
        }
    }

    #[test]
    fn test_extract_pdf_text_concatenates_pages() {
        let bytes = pdf_with_pages(&["Photosynthesis basics", "Light reactions"]);
        let text = extract_pdf_text(&bytes).unwrap();
        assert!(text.contains("Photosynthesis"), "got {:?}", text);
        assert!(text.contains("reactions"), "got {:?}", text);
        assert!(!text.contains("  "));
        assert!(text.find("Photosynthesis") < text.find("Light"));
    }

    #[test]
    fn test_extract_pdf_text_rejects_garbage() {
        let result = extract_pdf_text(b"definitely not a pdf");
        assert!(matches!(result, Err(TutorError::Ingestion(_))));
    }
}
