//! PDF learning report built from stored assessments.
//!
//! Plain A4 pages in the built-in Helvetica fonts: a title, the average
//! score, then one question/score pair per assessment. Lines that do not
//! fit flow onto the next page.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::info;

use crate::error::TutorError;
use crate::history::AssessmentRecord;
use crate::session::round2;

/// File name used when the report is written to disk.
pub const REPORT_FILE_NAME: &str = "learning_report.pdf";

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const BODY_SIZE: i64 = 11;
const TITLE_SIZE: i64 = 20;
const LINE_HEIGHT: i64 = 15;
/// Roughly what fits between the margins at 11pt Helvetica.
const WRAP_CHARS: usize = 88;

/// One laid-out line of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    Title(String),
    Text(String),
    Gap,
}

/// Build the report's logical lines: header, average, then every row.
pub fn report_lines(average: f64, rows: &[AssessmentRecord]) -> Vec<ReportLine> {
    let mut lines = vec![
        ReportLine::Title("AI Learning Report".to_string()),
        ReportLine::Gap,
        ReportLine::Text(format!("Average Score: {}", round2(average))),
        ReportLine::Gap,
    ];

    for row in rows {
        for wrapped in wrap(&format!("Q: {}", row.question), WRAP_CHARS) {
            lines.push(ReportLine::Text(wrapped));
        }
        let score = row
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(ReportLine::Text(format!("Score: {}/10", score)));
        lines.push(ReportLine::Gap);
    }
    lines
}

/// Greedy word wrap on character counts. Words longer than a line are
/// hard-split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            let mut pieces = chars.chunks(width).map(|p| p.iter().collect::<String>());
            // The tail stays open so following words can join it.
            let last = pieces.next_back().unwrap_or_default();
            out.extend(pieces);
            current = last;
            continue;
        }
        let extra = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && current.chars().count() + extra + word_len > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Standard 14 fonts only cover Latin-1; replace anything else.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u32 as u8 } else { b'?' })
        .collect()
}

/// Split lines into pages by vertical space.
fn paginate(lines: &[ReportLine]) -> Vec<Vec<&ReportLine>> {
    let usable = PAGE_HEIGHT - 2 * MARGIN;
    let mut pages = vec![Vec::new()];
    let mut used = 0;
    for line in lines {
        let height = match line {
            ReportLine::Title(_) => TITLE_SIZE + 8,
            ReportLine::Text(_) => LINE_HEIGHT,
            ReportLine::Gap => LINE_HEIGHT / 2,
        };
        if used + height > usable {
            pages.push(Vec::new());
            used = 0;
        }
        used += height;
        if let Some(page) = pages.last_mut() {
            page.push(line);
        }
    }
    pages
}

fn page_content(lines: &[&ReportLine]) -> Content {
    let mut operations = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;
    for line in lines {
        match line {
            ReportLine::Gap => y -= LINE_HEIGHT / 2,
            ReportLine::Title(text) | ReportLine::Text(text) => {
                let (font, size, height) = match line {
                    ReportLine::Title(_) => ("F2", TITLE_SIZE, TITLE_SIZE + 8),
                    _ => ("F1", BODY_SIZE, LINE_HEIGHT),
                };
                y -= height;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![font.into(), Object::Integer(size)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Integer(MARGIN), Object::Integer(y)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_latin1(text))],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
        }
    }
    Content { operations }
}

/// Render the report as PDF bytes.
pub fn build_report(average: f64, rows: &[AssessmentRecord]) -> Result<Vec<u8>, TutorError> {
    let lines = report_lines(average, rows);
    let pages = paginate(&lines);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let body_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let title_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => body_font,
            "F2" => title_font,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page_lines in &pages {
        let content = page_content(page_lines)
            .encode()
            .map_err(|e| TutorError::Report(format!("Failed to encode page: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| TutorError::Report(format!("Failed to write PDF: {}", e)))?;

    info!(
        "Built report: {} assessments on {} pages, {} bytes",
        rows.len(),
        page_count,
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, question: &str, score: Option<i64>) -> AssessmentRecord {
        AssessmentRecord {
            id,
            question: question.to_string(),
            answer: String::new(),
            score,
            strengths: String::new(),
            weaknesses: String::new(),
            model_answer: String::new(),
        }
    }

    #[test]
    fn test_report_lines_layout() {
        let rows = vec![row(1, "What is ATP?", Some(8)), row(2, "Define osmosis", None)];
        let lines = report_lines(6.5, &rows);

        assert_eq!(lines[0], ReportLine::Title("AI Learning Report".to_string()));
        assert_eq!(lines[2], ReportLine::Text("Average Score: 6.5".to_string()));
        assert!(lines.contains(&ReportLine::Text("Q: What is ATP?".to_string())));
        assert!(lines.contains(&ReportLine::Text("Score: 8/10".to_string())));
        assert!(lines.contains(&ReportLine::Text("Score: -/10".to_string())));
    }

    #[test]
    fn test_wrap_long_question() {
        let long = "word ".repeat(60);
        let wrapped = wrap(long.trim(), 40);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 40));
        assert_eq!(wrap("", 40), vec![String::new()]);
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let url = format!("https://example.com/{}", "a".repeat(100));
        let wrapped = wrap(&format!("Q: see {} please", url), 40);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 40), "{:?}", wrapped);
        assert_eq!(wrapped.concat().replace(' ', ""), format!("Q:see{}please", url));
        assert!(wrapped.last().unwrap().ends_with("please"));
    }

    #[test]
    fn test_report_average_rounded_to_two_places() {
        let average = crate::session::average_score(&[7, 8, 8]);
        let lines = report_lines(average, &[]);
        assert_eq!(lines[2], ReportLine::Text("Average Score: 7.67".to_string()));
    }

    #[test]
    fn test_encode_latin1_replaces_wide_chars() {
        assert_eq!(encode_latin1("café ✓"), vec![b'c', b'a', b'f', 0xE9, b' ', b'?']);
    }

    #[test]
    fn test_build_report_is_pdf() {
        let rows = vec![row(1, "What is ATP?", Some(8))];
        let bytes = build_report(8.0, &rows).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_build_report_flows_onto_more_pages() {
        let rows: Vec<AssessmentRecord> = (0..80)
            .map(|i| row(i, &format!("Question number {}", i), Some(i % 11)))
            .collect();
        let bytes = build_report(5.0, &rows).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_build_report_empty() {
        let bytes = build_report(0.0, &[]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
