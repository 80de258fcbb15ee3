use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::parsers::{DocumentParser, ParserError};

/// Main body part of a word-processing package.
const DOCUMENT_PART: &str = "word/document.xml";

/// Office Open XML (`.docx`). Non-empty paragraphs are joined with newlines.
pub struct DocxParser;

fn extraction_error(err: impl std::fmt::Display) -> ParserError {
    ParserError::Extraction {
        format: "docx",
        message: err.to_string(),
    }
}

impl DocumentParser for DocxParser {
    fn format(&self) -> &'static str {
        "docx"
    }

    fn parse(&self, data: &[u8]) -> Result<String, ParserError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(extraction_error)?;
        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(extraction_error)?
            .read_to_string(&mut xml)
            .map_err(extraction_error)?;

        Ok(paragraphs(&xml)?.join("\n"))
    }
}

/// Walks `w:p` elements, collecting the text of their `w:t` runs. Tabs and
/// line breaks inside a paragraph are kept.
fn paragraphs(xml: &str) -> Result<Vec<String>, ParserError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().map_err(extraction_error)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    let text = current.trim();
                    if !text.is_empty() {
                        paragraphs.push(text.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                current.push_str(&t.unescape().map_err(extraction_error)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}
